use owo_colors::OwoColorize;

/// Small wrapper around stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when stderr is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {msg}");
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {msg}");
    }
}

/// Plain result line (no prefix) for listings and counts that scripts consume.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

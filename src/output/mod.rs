//! Styled terminal output for the packager CLI
//!
//! Progress lines go to stdout; warnings and errors go to stderr so a run's
//! generated listing can be piped without the noise.

use owo_colors::OwoColorize;

type Rgb = (u8, u8, u8);

const MINT: Rgb = (152, 225, 152);
const CREAM: Rgb = (255, 230, 160);
const SKY: Rgb = (160, 200, 255);
const LAVENDER: Rgb = (181, 174, 254);
const TEAL: Rgb = (120, 180, 195);
const GREY: Rgb = (160, 160, 160);

fn symbol_line(symbol: &str, color: Rgb, message: &str) -> String {
    format!(
        "{} {}",
        symbol.truecolor(color.0, color.1, color.2).bold(),
        message.bright_white()
    )
}

fn grey(text: &str) -> String {
    text.truecolor(GREY.0, GREY.1, GREY.2).to_string()
}

pub fn success(message: &str) {
    println!("{}", symbol_line("✓", MINT, message));
}

pub fn warning(message: &str) {
    eprintln!("{}", symbol_line("⚠", CREAM, message));
}

pub fn info(message: &str) {
    println!("{}", symbol_line("ℹ", SKY, message));
}

/// Header for one command run, followed by a rule
pub fn section(title: &str) {
    println!(
        "\n{}",
        title.truecolor(LAVENDER.0, LAVENDER.1, LAVENDER.2).bold()
    );
    println!("{}", grey(&"─".repeat(50)));
}

/// Header for one pipeline phase
pub fn subsection(title: &str) {
    println!("\n{}", title.truecolor(TEAL.0, TEAL.1, TEAL.2));
    println!("{}", grey(&"·".repeat(30)));
}

pub fn key_value(key: &str, value: &str) {
    println!("  {} {}", grey(&format!("{}:", key)), value.bright_white());
}

pub fn dimmed(message: &str) {
    println!("{}", grey(message));
}

/// Bulleted entry, used for generated files and discovered items
pub fn list_item(text: &str) {
    println!("  {} {}", "•".bright_white(), text.bright_white());
}

pub fn blank() {
    println!();
}

//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(provider: &str, model: &str) {
    println!();
    println!("  {}", style("sumchat").cyan().bold());
    println!();
    println!("  {}  {}", style("Provider:").bold(), style(provider).dim());
    println!("  {}     {}", style("Model:").bold(), style(model).dim());
    println!();
    println!("  {}", style("Ctrl+D ends the session").dim());
    println!("  {}", style("---").dim());
}

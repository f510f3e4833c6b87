use std::error::Error;
use std::io::{self, Write};

use crate::cli::Args;
use crate::conversation::ConversationController;
use crate::relay;

/// Interactive terminal session: one line per turn, driven through the same
/// relay client the HTTP server uses. `/quit` or EOF exits.
pub async fn run_console(args: &Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let relay = relay::new_client(args)?;
    let mut controller = ConversationController::new(relay);

    if let Some(welcome) = controller.conversation().last() {
        println!("assistant: {}", welcome.content);
    }
    println!("Type a message and press Enter. /quit exits.");

    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input == "/quit" {
            break;
        }

        // Blank lines are rejected by the controller.
        if !controller.send(input).await {
            continue;
        }

        if let Some(reply) = controller.conversation().last() {
            println!("\nassistant: {}", reply.content);
        }
    }

    Ok(())
}

//! Chat Engine - Demo Entry Point
//!
//! Runs a short scripted session against the process-wide server to show
//! the engine end to end: registration, rooms, chat, and a private
//! message. An interactive front end would drive the same calls.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_engine::{ChatClient, ChatServer, DEFAULT_RECENT_COUNT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_engine=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_engine=info")),
        )
        .init();

    let server = ChatServer::global();

    let client = Arc::new(ChatClient::new());
    server.subscribe(client.clone());

    let alice = server.register_user("alice")?;
    let bob = server.register_user("bob")?;
    info!("registered {} users", server.user_count());

    let general = server.create_room_default("general")?;
    client.set_current_user(Some(alice.clone()));
    client.set_current_room(Some(general.clone()));

    server.join_room(&alice, &general);
    server.join_room(&bob, &general);

    // Await the delivery outcome; the message is in history either way
    let delivered = server.send_message(&alice, &general, "hello, room").await?;
    info!("room delivery ok: {}", delivered);

    let delivered = server.send_private_message(&bob, "Alice", "psst, alice").await?;
    info!("private delivery ok: {}", delivered);

    server.leave_room(&bob, &general);

    if let Some(room) = server.room(&general) {
        println!("--- Recent Messages ---");
        for message in room.recent_messages(DEFAULT_RECENT_COUNT) {
            println!("{}", message);
        }
        println!("--- End of Messages ---");
    }

    Ok(())
}

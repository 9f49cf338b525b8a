//! CLI module for the lodgr command-line interface.
//!
//! Provides subcommands for interacting with a running lodgr server:
//! - `register` / `login` / `logout` - Account and session management
//! - `rooms list|show|add|update|delete` - Room management
//! - `overview` - Occupancy statistics summary

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::client::{ApiClient, ClientError, TokenStore};
use crate::db::{RegisterRequest, Room, RoomRequest, RoomStatus};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "lodgr")]
#[command(author, version, about = "A lightweight room management server and CLI", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "lodgr.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to
    #[arg(long, env = "LODGR_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Session token (overrides the stored token)
    #[arg(long, env = "LODGR_TOKEN")]
    pub token: Option<String>,

    /// Path to the stored session token file
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new account
    Register {
        /// Full name
        #[arg(long)]
        name: String,
        /// Phone number
        #[arg(long)]
        phone_number: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Password (min 8 characters)
        #[arg(long)]
        password: String,
    },

    /// Log in and store the session token
    Login {
        /// Email address
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },

    /// Invalidate the session and discard the stored token
    Logout,

    /// Room management commands
    #[command(subcommand)]
    Rooms(RoomsCommands),

    /// Show the room occupancy overview
    Overview,
}

/// Rooms subcommands
#[derive(Subcommand, Debug)]
pub enum RoomsCommands {
    /// List all rooms
    List,
    /// Show details for a specific room
    Show {
        /// Room ID
        id: String,
    },
    /// Add a new room
    Add(RoomArgs),
    /// Update a room, replacing its fields
    Update {
        /// Room ID
        id: String,
        #[command(flatten)]
        room: RoomArgs,
    },
    /// Delete a room
    Delete {
        /// Room ID
        id: String,
    },
}

/// Room fields shared by add and update
#[derive(Args, Debug)]
pub struct RoomArgs {
    /// Room number (unique)
    #[arg(long)]
    pub room_number: String,

    /// Room status: occupied, vacant or maintenance
    #[arg(long, default_value = "vacant")]
    pub status: RoomStatus,

    /// Bed capacity
    #[arg(long)]
    pub capacity: Option<i64>,

    /// Price per period
    #[arg(long)]
    pub price: Option<f64>,

    /// Floor label
    #[arg(long)]
    pub floor: Option<String>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
}

impl RoomArgs {
    fn to_request(&self) -> RoomRequest {
        RoomRequest {
            room_number: self.room_number.clone(),
            status: self.status,
            capacity: self.capacity,
            price: self.price,
            floor: self.floor.clone(),
            description: self.description.clone(),
        }
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Register {
            name,
            phone_number,
            email,
            password,
        }) => cmd_register(cli, name, phone_number, email, password).await,
        Some(Commands::Login { email, password }) => cmd_login(cli, email, password).await,
        Some(Commands::Logout) => cmd_logout(cli).await,
        Some(Commands::Rooms(RoomsCommands::List)) => cmd_rooms_list(cli).await,
        Some(Commands::Rooms(RoomsCommands::Show { id })) => cmd_rooms_show(cli, id).await,
        Some(Commands::Rooms(RoomsCommands::Add(args))) => cmd_rooms_add(cli, args).await,
        Some(Commands::Rooms(RoomsCommands::Update { id, room })) => {
            cmd_rooms_update(cli, id, room).await
        }
        Some(Commands::Rooms(RoomsCommands::Delete { id })) => cmd_rooms_delete(cli, id).await,
        Some(Commands::Overview) => cmd_overview(cli).await,
        None => {
            // No subcommand means start the server - this is handled in main.rs
            Ok(())
        }
    }
}

fn token_store(cli: &Cli) -> TokenStore {
    TokenStore::new(
        cli.token_file
            .clone()
            .unwrap_or_else(TokenStore::default_path),
    )
}

/// Resolve the session token: explicit flag/env first, then the token store.
fn resolve_token(cli: &Cli) -> Result<String> {
    if let Some(token) = &cli.token {
        return Ok(token.clone());
    }

    token_store(cli)
        .load()?
        .ok_or_else(|| anyhow!("Not logged in. Run `lodgr login` first."))
}

fn authed_client(cli: &Cli) -> Result<ApiClient> {
    Ok(ApiClient::new(&cli.api_url, Some(resolve_token(cli)?)))
}

async fn cmd_register(
    cli: &Cli,
    name: &str,
    phone_number: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let client = ApiClient::new(&cli.api_url, None);

    let user = client
        .register(&RegisterRequest {
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .context("Registration failed")?;

    println!("[OK] Registered {} <{}>", user.name, user.email);
    println!("Run `lodgr login --email {}` to sign in.", user.email);
    Ok(())
}

async fn cmd_login(cli: &Cli, email: &str, password: &str) -> Result<()> {
    let client = ApiClient::new(&cli.api_url, None);

    let response = client
        .login(email, password)
        .await
        .context("Login failed")?;

    let store = token_store(cli);
    store.save(&response.token)?;

    println!("[OK] Logged in as {} <{}>", response.user.name, response.user.email);
    Ok(())
}

async fn cmd_logout(cli: &Cli) -> Result<()> {
    let store = token_store(cli);

    match authed_client(cli) {
        Ok(client) => {
            // A token the server no longer accepts is already logged out
            match client.logout().await {
                Ok(()) | Err(ClientError::Auth(_)) => {}
                Err(e) => return Err(e).context("Logout failed"),
            }
        }
        Err(_) => {
            println!("Already logged out.");
            return Ok(());
        }
    }

    store.clear()?;
    println!("[OK] Logged out");
    Ok(())
}

async fn cmd_rooms_list(cli: &Cli) -> Result<()> {
    let client = authed_client(cli)?;
    let rooms = client.list_rooms().await.context("Failed to list rooms")?;

    if rooms.is_empty() {
        println!("No rooms found.");
        return Ok(());
    }

    println!();
    println!(
        "{:<36}  {:<10}  {:<12}  {:>8}  {:>10}  {:<10}",
        "ID", "NUMBER", "STATUS", "CAPACITY", "PRICE", "FLOOR"
    );
    println!("{}", "-".repeat(96));

    for room in &rooms {
        println!(
            "{:<36}  {:<10}  {:<12}  {:>8}  {:>10}  {:<10}",
            room.id,
            truncate(&room.room_number, 10),
            room.status.to_string(),
            room.capacity.map_or("-".to_string(), |c| c.to_string()),
            room.price.map_or("-".to_string(), |p| format!("{:.2}", p)),
            truncate(room.floor.as_deref().unwrap_or("-"), 10),
        );
    }

    println!();
    println!("{} room(s)", rooms.len());
    Ok(())
}

async fn cmd_rooms_show(cli: &Cli, id: &str) -> Result<()> {
    let client = authed_client(cli)?;
    let room = client.get_room(id).await.context("Failed to fetch room")?;

    print_room(&room);
    Ok(())
}

async fn cmd_rooms_add(cli: &Cli, args: &RoomArgs) -> Result<()> {
    let client = authed_client(cli)?;

    let room = client
        .add_room(&args.to_request())
        .await
        .context("Failed to add room")?;

    println!("[OK] Room {} added", room.room_number);
    print_room(&room);
    Ok(())
}

async fn cmd_rooms_update(cli: &Cli, id: &str, args: &RoomArgs) -> Result<()> {
    let client = authed_client(cli)?;

    let room = client
        .update_room(id, &args.to_request())
        .await
        .context("Failed to update room")?;

    println!("[OK] Room {} updated", room.room_number);
    print_room(&room);
    Ok(())
}

async fn cmd_rooms_delete(cli: &Cli, id: &str) -> Result<()> {
    let client = authed_client(cli)?;
    client
        .delete_room(id)
        .await
        .context("Failed to delete room")?;

    println!("[OK] Room deleted");
    Ok(())
}

async fn cmd_overview(cli: &Cli) -> Result<()> {
    let client = authed_client(cli)?;
    let stats = client
        .room_statistics()
        .await
        .context("Failed to fetch room statistics")?;

    println!();
    println!("=== Room Occupancy ===");
    println!();
    println!("Total Rooms:     {}", stats.total());
    println!("Current Tenants: {}", stats.occupied);
    println!();

    for (label, count) in [
        ("Occupied", stats.occupied),
        ("Vacant", stats.vacant),
        ("Maintenance", stats.maintenance),
    ] {
        let pct = stats.percentage(count);
        println!(
            "  {:<12} {:>4}  {:>3}%  |{}|",
            label,
            count,
            pct,
            occupancy_bar(pct)
        );
    }

    println!();
    Ok(())
}

fn print_room(room: &Room) {
    println!();
    println!("ID:          {}", room.id);
    println!("Number:      {}", room.room_number);
    println!("Status:      {}", room.status);
    println!(
        "Capacity:    {}",
        room.capacity.map_or("-".to_string(), |c| c.to_string())
    );
    println!(
        "Price:       {}",
        room.price.map_or("-".to_string(), |p| format!("{:.2}", p))
    );
    println!("Floor:       {}", room.floor.as_deref().unwrap_or("-"));
    println!(
        "Description: {}",
        room.description.as_deref().unwrap_or("-")
    );
    println!("Created:     {}", room.created_at);
    println!("Updated:     {}", room.updated_at);
    println!();
}

/// Fixed-width bar for a whole percentage, 40 characters wide
fn occupancy_bar(pct: u8) -> String {
    const WIDTH: usize = 40;
    let filled = (pct.min(100) as usize * WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), " ".repeat(WIDTH - filled))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= max_len.saturating_sub(3))
            .last()
            .unwrap_or(0);
        format!("{}...", &s[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupancy_bar_width() {
        assert_eq!(occupancy_bar(0).len(), 40);
        assert_eq!(occupancy_bar(50).len(), 40);
        assert_eq!(occupancy_bar(100), "#".repeat(40));
        assert_eq!(occupancy_bar(50).chars().filter(|&c| c == '#').count(), 20);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("101", 10), "101");
        assert_eq!(truncate("a-very-long-room-number", 10), "a-very-...");
    }
}

//! # Taskboard Client
//!
//! Typed HTTP client for the Taskboard API and the kanban board state that
//! sits on top of it.
//!
//! ## Modules
//!
//! - `api`: The `TaskApi` trait, the reqwest client and a scripted mock
//! - `board`: Board state container with optimistic moves and reconciliation
//! - `error`: Client error type
//!
//! ## Example
//!
//! ```no_run
//! use taskboard_client::{api::TaskboardClient, board::Board};
//!
//! # async fn example(project_id: uuid::Uuid) -> Result<(), taskboard_client::error::ClientError> {
//! let client = TaskboardClient::new("http://127.0.0.1:5000/api")?;
//! client.login("ada@example.com", "secret123").await?;
//!
//! let board = Board::new(client, project_id);
//! board.load().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod board;
pub mod error;

pub use api::{TaskApi, TaskboardClient};
pub use board::{Board, BoardState};
pub use error::{ClientError, ClientResult};

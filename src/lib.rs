//! # coauthors
//!
//! Fetch a Google Scholar author's co-author list and save it as a CSV file.
//!
//! ## Modules
//!
//! - [`scholar`] - Google Scholar profile client (search, id lookup, co-author section)
//! - [`resolve`] - Author identity resolution with pluggable disambiguation
//! - [`export`] - Co-author table construction and CSV output
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use coauthors::export;
//! use coauthors::resolve::{resolve, AuthorQuery, PickFirst};
//! use coauthors::scholar::{ClientOptions, ScholarClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ScholarClient::new(&ClientOptions::default())?;
//!     let query = AuthorQuery::ById("MhJTimgAAAAJ".to_string());
//!     let author = resolve(&client, &query, &PickFirst).await?;
//!     export::save_coauthors(&client, &author, "coauthors.csv".as_ref()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod export;
pub mod resolve;
pub mod scholar;

pub use error::{CoauthorsError, Result};

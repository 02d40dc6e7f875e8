//! Author identity resolution.
//!
//! Turns a name or scholar-id query into exactly one [`AuthorRecord`].
//! Ambiguous name searches are settled by a [`CandidateSelector`] strategy,
//! so automated callers can swap the interactive prompt for a
//! non-interactive policy.

use crate::error::{CoauthorsError, Result};
use crate::scholar::{AuthorRecord, ScholarClient};
use std::io::{self, Write};
use tracing::debug;

/// How the operator identifies the author
#[derive(Debug, Clone)]
pub enum AuthorQuery {
    /// Stable scholar id (the `user=` value in a citations URL)
    ById(String),
    /// Display name, optionally narrowed by institution
    ByName {
        /// Author name
        name: String,
        /// Institution to narrow same-name profiles
        institution: Option<String>,
    },
}

impl AuthorQuery {
    /// Search string sent to the author search endpoint.
    ///
    /// Name and institution are joined into a single multi-field query.
    pub fn search_string(&self) -> String {
        match self {
            AuthorQuery::ById(id) => id.clone(),
            AuthorQuery::ByName { name, institution } => match institution {
                Some(institute) => format!("{}, {}", name, institute),
                None => name.clone(),
            },
        }
    }
}

/// Strategy for choosing among multiple candidate profiles
pub trait CandidateSelector {
    /// Return the index of the chosen candidate.
    ///
    /// Called only when there are at least two candidates.
    fn select(&self, candidates: &[AuthorRecord]) -> Result<usize>;
}

/// Interactive selection over stdin, by 1-based entry number
pub struct StdinSelector;

impl CandidateSelector for StdinSelector {
    fn select(&self, candidates: &[AuthorRecord]) -> Result<usize> {
        println!("Confirm author name");
        for (i, candidate) in candidates.iter().enumerate() {
            println!(
                "{}: {}, {}, {}, scholar id: {}",
                i + 1,
                candidate.name,
                candidate.affiliation,
                candidate.email_domain,
                candidate.scholar_id
            );
        }
        print!("Entry number id: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        let entry: usize = input
            .parse()
            .map_err(|_| CoauthorsError::Selection(format!("Not an entry number: {:?}", input)))?;

        if entry < 1 || entry > candidates.len() {
            return Err(CoauthorsError::Selection(format!(
                "Entry {} out of range 1..={}",
                entry,
                candidates.len()
            )));
        }

        Ok(entry - 1)
    }
}

/// Non-interactive strategy: always take the first candidate
pub struct PickFirst;

impl CandidateSelector for PickFirst {
    fn select(&self, _candidates: &[AuthorRecord]) -> Result<usize> {
        Ok(0)
    }
}

/// Non-interactive strategy: refuse to guess among multiple candidates
pub struct FailOnAmbiguous;

impl CandidateSelector for FailOnAmbiguous {
    fn select(&self, candidates: &[AuthorRecord]) -> Result<usize> {
        Err(CoauthorsError::Selection(format!(
            "{} candidates matched, expected exactly one",
            candidates.len()
        )))
    }
}

/// Resolve a query to exactly one author profile.
///
/// By id this is a single lookup. By name it searches, fails on zero
/// candidates, auto-selects a unique match, and otherwise delegates to the
/// selector.
pub async fn resolve(
    client: &ScholarClient,
    query: &AuthorQuery,
    selector: &dyn CandidateSelector,
) -> Result<AuthorRecord> {
    match query {
        AuthorQuery::ById(scholar_id) => client.search_author_id(scholar_id).await,
        AuthorQuery::ByName { .. } => {
            let search = query.search_string();
            let candidates = client.search_authors(&search).await?;

            if candidates.is_empty() {
                return Err(CoauthorsError::AuthorNotFound(search));
            }

            let index = if candidates.len() == 1 {
                0
            } else {
                debug!(count = candidates.len(), "Multiple candidates, disambiguating");
                selector.select(&candidates)?
            };

            let count = candidates.len();
            candidates.into_iter().nth(index).ok_or_else(|| {
                CoauthorsError::Selection(format!("Index {} out of range 0..{}", index, count))
            })
        }
    }
}

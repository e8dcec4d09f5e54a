//! The movies/actors/castings dataset.
//!
//! Rows are plain serde structs so loaders can deserialize them straight
//! from CSV or NDJSON. A `Dataset` is immutable once built; the engine
//! refuses to query one that fails [`Dataset::validate`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{hash_serde, Hash256};
use crate::schema::{DataType, Field, Schema};
use crate::types::{Column, RowBatch, Scalar};

pub const MOVIES: &str = "movies";
pub const ACTORS: &str = "actors";
pub const CASTINGS: &str = "castings";

/// Base tables, in load order.
pub const TABLES: [&str; 3] = [MOVIES, ACTORS, CASTINGS];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub yr: i64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub director_id: Option<i64>,
}

impl Movie {
    pub fn new(id: i64, title: impl Into<String>, yr: i64) -> Self {
        Self {
            id,
            title: title.into(),
            yr,
            score: 0.0,
            votes: 0,
            director_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
}

impl Actor {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Credit linking an actor to a movie. `ord == 1` is the starring role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Casting {
    pub movie_id: i64,
    pub actor_id: i64,
    pub ord: i64,
}

impl Casting {
    pub fn new(movie_id: i64, actor_id: i64, ord: i64) -> Self {
        Self {
            movie_id,
            actor_id,
            ord,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub movies: Vec<Movie>,
    pub actors: Vec<Actor>,
    pub castings: Vec<Casting>,
}

impl Dataset {
    pub fn new(movies: Vec<Movie>, actors: Vec<Actor>, castings: Vec<Casting>) -> Self {
        Self {
            movies,
            actors,
            castings,
        }
    }

    /// Qualified schema of a base table, or `None` for an unknown name.
    pub fn table_schema(table: &str) -> Option<Schema> {
        let fields = match table {
            MOVIES => vec![
                Field::new("id", DataType::Int64, false),
                Field::new("title", DataType::Utf8, false),
                Field::new("yr", DataType::Int64, false),
                Field::new("score", DataType::Float64, false),
                Field::new("votes", DataType::Int64, false),
                Field::new("director_id", DataType::Int64, true),
            ],
            ACTORS => vec![
                Field::new("id", DataType::Int64, false),
                Field::new("name", DataType::Utf8, false),
            ],
            CASTINGS => vec![
                Field::new("movie_id", DataType::Int64, false),
                Field::new("actor_id", DataType::Int64, false),
                Field::new("ord", DataType::Int64, false),
            ],
            _ => return None,
        };
        Some(Schema::new(fields).qualified(table))
    }

    /// Column-major copy of a base table with qualified column names.
    pub fn to_batch(&self, table: &str) -> Option<RowBatch> {
        let column =
            |name: &str, values: Vec<Scalar>| Column::new(format!("{table}.{name}"), values);
        let columns = match table {
            MOVIES => vec![
                column("id", self.movies.iter().map(|m| m.id.into()).collect()),
                column("title", self.movies.iter().map(|m| m.title.as_str().into()).collect()),
                column("yr", self.movies.iter().map(|m| m.yr.into()).collect()),
                column("score", self.movies.iter().map(|m| m.score.into()).collect()),
                column("votes", self.movies.iter().map(|m| m.votes.into()).collect()),
                column("director_id", self.movies.iter().map(|m| m.director_id.into()).collect()),
            ],
            ACTORS => vec![
                column("id", self.actors.iter().map(|a| a.id.into()).collect()),
                column("name", self.actors.iter().map(|a| a.name.as_str().into()).collect()),
            ],
            CASTINGS => vec![
                column("movie_id", self.castings.iter().map(|c| c.movie_id.into()).collect()),
                column("actor_id", self.castings.iter().map(|c| c.actor_id.into()).collect()),
                column("ord", self.castings.iter().map(|c| c.ord.into()).collect()),
            ],
            _ => return None,
        };
        Some(RowBatch::new(columns))
    }

    /// Every integrity violation, in storage order.
    pub fn problems(&self) -> Vec<Error> {
        let mut problems = Vec::new();

        let mut movie_ids = HashSet::with_capacity(self.movies.len());
        for m in &self.movies {
            if !movie_ids.insert(m.id) {
                problems.push(Error::DuplicateKey {
                    table: MOVIES,
                    key: m.id.to_string(),
                });
            }
        }

        let mut actor_ids = HashSet::with_capacity(self.actors.len());
        for a in &self.actors {
            if !actor_ids.insert(a.id) {
                problems.push(Error::DuplicateKey {
                    table: ACTORS,
                    key: a.id.to_string(),
                });
            }
        }

        let mut pairs = HashSet::with_capacity(self.castings.len());
        for c in &self.castings {
            if !movie_ids.contains(&c.movie_id) {
                problems.push(Error::DataIntegrity {
                    table: CASTINGS,
                    column: "movie_id",
                    value: c.movie_id.to_string(),
                    referenced: MOVIES,
                });
            }
            if !actor_ids.contains(&c.actor_id) {
                problems.push(Error::DataIntegrity {
                    table: CASTINGS,
                    column: "actor_id",
                    value: c.actor_id.to_string(),
                    referenced: ACTORS,
                });
            }
            if !pairs.insert((c.movie_id, c.actor_id)) {
                problems.push(Error::DuplicateKey {
                    table: CASTINGS,
                    key: format!("({}, {})", c.movie_id, c.actor_id),
                });
            }
            if c.ord < 1 {
                problems.push(Error::Invariant(format!(
                    "castings ({}, {}) has non-positive ord {}",
                    c.movie_id, c.actor_id, c.ord
                )));
            }
        }

        problems
    }

    /// First integrity violation, if any.
    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn fingerprint(&self) -> Result<Hash256> {
        hash_serde(self)
    }
}

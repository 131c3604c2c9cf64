//! Rebuild forests from flat records that carry a code and an optional parent code.
//!
//! The engine lives in [`domain`]: cycle detection, memoized depths, ancestor and
//! descendant queries, and the arena-backed [`domain::Forest`] that assembles
//! records into trees and flattens them with breadcrumbs.
//!
//! ```
//! use hierarchy::domain::{Forest, Record};
//!
//! let mut forest = Forest::new();
//! forest
//!     .insert_all(vec![
//!         Record::child("C", "B"),
//!         Record::root("A"),
//!         Record::child("B", "A"),
//!     ])
//!     .unwrap();
//!
//! let crumbs: Vec<_> = forest.flatten().into_iter().map(|n| n.breadcrumb).collect();
//! assert_eq!(crumbs, vec![vec![], vec!["A"], vec!["A", "B"]]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

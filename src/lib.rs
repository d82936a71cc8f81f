// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

//! An arena-backed [`skip list`] with duplicate keys, a seedable height
//! generator, and a text renderer for inspecting its levels.
//!
//! ```
//! use cesium_skiplist::{
//!     Grid,
//!     SkipListBuilder,
//! };
//!
//! let mut list = SkipListBuilder::new().max_level(10).seed(7).build().unwrap();
//! list.extend([20, 40, 10, 20, 5, 80]);
//!
//! assert!(list.lookup(&80).is_some());
//! assert_eq!(list.len(), 6);
//!
//! assert!(list.delete(&20));
//! assert_eq!(list.count(&20), 1);
//!
//! print!("{}", Grid::new(&list));
//! ```
//!
//! [`skip list`]: https://en.wikipedia.org/wiki/Skip_list

/// Construction defaults and the list builder.
pub mod config;
pub mod errs;
/// Grid rendering of a list's levels.
pub mod render;
pub mod skiplist;

pub use crate::{
    config::SkipListBuilder,
    errs::SkipListError,
    render::Grid,
    skiplist::SkipList,
};

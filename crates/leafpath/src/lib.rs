#![doc = include_str!("../README.md")]

mod error;
mod filter;
mod parse;
mod policy;
mod reverse;
mod traverse;
mod types;

pub use error::{Error, Result};

pub mod v1 {
    //! Versioned public API for leafpath.
    //!
    //! # Trees
    //!
    //! - [`Document`] — a parsed file, with an optional root
    //! - [`Node`] — one element: tag, attributes, children, text
    //! - [`NodeKind`] — branch, leaf, or inert
    //! - [`parse`] — build a [`Document`] from XML text
    //!
    //! # Flattening
    //!
    //! - [`IndexingPolicy`] / [`ForceIndex`] — when `[N]` and `[@attr="v"]`
    //!   qualifiers appear in a path
    //! - [`PolicyFile`] — JSON form of a policy
    //! - [`traverse`] — the path-generating walk
    //! - [`Leaf`] — one `value : path` output line
    //!
    //! # Going back
    //!
    //! - [`reverse`] — parse `value : path` lines into [`Record`]s
    //! - [`filter`] — keep records whose path is in a set
    //!
    //! # Example — flatten a small document
    //!
    //! ```
    //! use leafpath::v1::*;
    //!
    //! let doc = parse(r#"
    //!     <library>
    //!       <book id="a"><title>Dune</title></book>
    //!       <book id="b"><title>Emma</title></book>
    //!     </library>"#).unwrap();
    //!
    //! let policy = IndexingPolicy::default().force_all();
    //! let lines = render_lines(&traverse::flatten(&doc, &policy));
    //!
    //! assert_eq!(
    //!     lines,
    //!     "Dune : /library/book[1]/title[1]\nEmma : /library/book[2]/title[1]"
    //! );
    //! ```

    /// Depth-first path generation over [`Node`] trees.
    pub mod traverse {
        pub use crate::traverse::{
            SiblingCounters, assemble_path, assemble_segment, build_predicate, flatten,
            flatten_iterative, root_path, traverse, traverse_iterative,
        };
    }

    /// `value : path` lines back to records.
    pub mod reverse {
        pub use crate::reverse::{
            NEST_PADDING_LIMIT, Record, SEPARATOR, nest, parse_line, records_from_str,
            strip_qualifiers,
        };
    }

    /// Path-set filters over records.
    pub mod filter {
        pub use crate::filter::{
            filter_by_key, filter_by_paths, filter_by_stripped_paths, filter_lines, path_set,
        };
    }

    pub use crate::error::{Error, Result};
    pub use crate::parse::parse;
    pub use crate::policy::{ForceIndex, IndexingPolicy, PolicyFile};
    pub use crate::reverse::Record;
    pub use crate::types::{Document, Leaf, Node, NodeKind, render_lines};
}

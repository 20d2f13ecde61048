//! Titlecard composes featured images: a source photo on a fixed-size canvas
//! with a styled two-line title banner, an optional tier accent outline, and
//! an optional logo thumbnail.
//!
//! The public API is composer-oriented:
//!
//! - Resolve a title (explicit, or derived from a file name)
//! - Build a [`TitleRequest`] and run it through a [`Composer`]
//! - Save the [`ComposedImage`] with [`save_copy`], or title a whole
//!   directory with [`process_batch`]
//!
//! Composition is deterministic: the same request yields byte-identical
//! pixels, which is what the integration tests pin.
#![forbid(unsafe_code)]

pub mod assets;
pub mod batch;
pub mod compose;
pub mod foundation;
pub mod store;

pub use crate::assets::color::dominant_opaque_color;
pub use crate::assets::decode::{SourceImage, decode_source};
pub use crate::assets::font::{DEFAULT_FONT_SIZE_PX, FontSpec};
pub use crate::batch::{BatchJob, BatchReport, process_batch};
pub use crate::compose::engine::{ComposedImage, Composer, TitleRequest};
pub use crate::compose::theme::{Theme, Tier};
pub use crate::compose::title::{SplitTitle, resolve_title, split_by_nearest_middle_space};
pub use crate::foundation::core::Rgba8;
pub use crate::foundation::error::{TitlerError, TitlerResult};
pub use crate::store::{output_file_name, save_copy};

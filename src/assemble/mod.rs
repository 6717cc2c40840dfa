//! Text reconstruction: line classification, paragraph reassembly,
//! heading resolution and the page walker.

mod classify;
mod heading;
mod reassemble;
mod walker;

pub use classify::{
    count_number_depth, is_embedded_reference, is_numbering, is_paragraph_end,
    is_paragraph_start, numbering_token,
};
pub use heading::{anchor, resolve_block};
pub use reassemble::{paragraphs, reassemble};
pub use walker::{assemble_document, assemble_pages, PageWalker};

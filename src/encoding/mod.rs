//! One-hot encoding of tours.
//!
//! - [`OneHotAssignment`] — flat row-major `[time_slot][node]` bit matrix
//! - [`encode`] / [`decode_tour`] — reduced-form tour codec (start node fixed)
//! - [`encode_order`] / [`decode`] — raw square codec with strict or lenient decoding
//! - [`ReductionContext`] — fixed-start reduce/expand transform

mod assignment;
mod codec;
mod reduction;

pub use assignment::OneHotAssignment;
pub(crate) use assignment::square_side;
pub use codec::{
    decode, decode_tour, encode, encode_order, feasible_assignments, DecodeMode, DecodedOrder,
};
pub use reduction::ReductionContext;

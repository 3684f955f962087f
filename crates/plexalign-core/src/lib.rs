pub mod align;
pub mod color;
pub mod consts;
pub mod error;
pub mod frame;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod roi;
pub mod rounds;

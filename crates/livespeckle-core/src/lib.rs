pub mod config;
pub mod consts;
pub mod error;
pub mod filters;
pub mod frame;
pub mod handoff;
pub mod io;
pub mod pipeline;
pub mod spectral;
pub mod visual;

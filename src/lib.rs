#![doc = include_str!("../README.md")]

mod access_mode;
mod builder;
mod engine;
mod evictor;
pub mod error;
mod file_handle;
mod mapper;
mod mapping;
mod region;
mod region_table;
mod size_calculator;

pub use access_mode::AccessMode;
pub use builder::PagedFileBuilder;
pub use engine::PagedFile;
pub use error::*;
pub use evictor::Evictor;
pub use file_handle::FileHandle;
pub use mapper::Mapper;
pub use mapping::Mapping;
pub use region::Region;
pub use region_table::RegionTable;
pub use size_calculator::clamp;

pub mod inst;
pub mod op;
pub mod pseudo;
pub mod reg;
pub mod width;

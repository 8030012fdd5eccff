pub mod control;
pub mod machine;
pub mod value;

pub use control::{Control, Instr};
pub use machine::{Machine, MachineError, Step};
pub use value::Value;

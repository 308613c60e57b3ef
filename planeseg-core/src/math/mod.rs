mod plane;
pub use self::plane::*;

mod iterations;
pub use self::iterations::*;

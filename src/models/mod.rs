pub mod movement;

pub use movement::{
    DateField, Movement, MovementInput, MovementStatus, StatusFilter, ViewType,
};

pub mod piste;
pub mod skier;

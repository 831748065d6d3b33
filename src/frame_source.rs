pub mod impl_live;
pub mod impl_single_shot;
pub mod interface;

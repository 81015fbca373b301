pub mod anim;
pub mod logging;
pub mod ticker;
pub mod unicode;

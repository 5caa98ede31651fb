pub mod fit;
pub mod fonts;

mod mean;

pub use mean::Mean;

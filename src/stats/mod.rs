/// Statistics layer: midpoint aggregation and the inter-rater COV table.
pub mod aggregate;
pub mod variability;

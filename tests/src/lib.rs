//! Cross-crate tests: records flow from a store through model training,
//! prediction and analytics the way the CLI drives them.

#[cfg(test)]
mod pipeline;

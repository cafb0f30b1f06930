//! Data Processor Module
//! Reshapes per-key casual/registered columns into long form (stack operation).

use super::model::UserType;
use serde::Serialize;

/// A wide row: one key with one value per user type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTypeValues<K> {
    pub key: K,
    pub casual: f64,
    pub registered: f64,
}

impl<K> UserTypeValues<K> {
    pub fn get(&self, user_type: UserType) -> f64 {
        match user_type {
            UserType::Casual => self.casual,
            UserType::Registered => self.registered,
        }
    }
}

/// A long row: one (key, user type) pair and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow<K> {
    pub key: K,
    pub user_type: UserType,
    pub value: f64,
}

/// Handles data reshaping operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Transform wide user-type data to long format.
    ///
    /// Rows come out grouped by user type (all casual rows, then all
    /// registered rows), each group in input order.
    pub fn stack_to_long<K: Clone>(wide: &[UserTypeValues<K>]) -> Vec<LongRow<K>> {
        UserType::ALL
            .iter()
            .flat_map(|&user_type| {
                wide.iter().map(move |row| LongRow {
                    key: row.key.clone(),
                    user_type,
                    value: row.get(user_type),
                })
            })
            .collect()
    }

    /// Values of one user type from a long table, in row order.
    pub fn values_for<K: Clone>(long: &[LongRow<K>], user_type: UserType) -> Vec<(K, f64)> {
        long.iter()
            .filter(|row| row.user_type == user_type)
            .map(|row| (row.key.clone(), row.value))
            .collect()
    }
}

//! Error handling and result types for BPlusTreeMap operations.
//!
//! Absent keys are reported through `Option` by the primary operations. The
//! error type here covers construction failures, the checked operations, and
//! the diagnostic validator.

/// Error type for B+ tree operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BPlusTreeError {
    /// Key not found in the tree.
    KeyNotFound,
    /// Invalid order specified at construction.
    InvalidOrder(String),
    /// Internal data structure integrity violation.
    DataIntegrityError(String),
    /// Tree corruption detected.
    CorruptedTree(String),
}

impl BPlusTreeError {
    /// Create an InvalidOrder error with context
    pub fn invalid_order(order: usize, min_required: usize) -> Self {
        Self::InvalidOrder(format!(
            "Order {} is invalid (minimum required: {})",
            order, min_required
        ))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is an order error
    pub fn is_order_error(&self) -> bool {
        matches!(self, Self::InvalidOrder(_))
    }

    /// Check if this error reports a structural problem
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::DataIntegrityError(_) | Self::CorruptedTree(_))
    }
}

impl std::fmt::Display for BPlusTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BPlusTreeError::KeyNotFound => write!(f, "Key not found in tree"),
            BPlusTreeError::InvalidOrder(msg) => write!(f, "Invalid order: {}", msg),
            BPlusTreeError::DataIntegrityError(msg) => write!(f, "Data integrity error: {}", msg),
            BPlusTreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for BPlusTreeError {}

/// Public result type for tree operations that may fail
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, BPlusTreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, BPlusTreeError>;

/// Result extension trait for attaching call-site context to errors
pub trait BTreeResultExt<T> {
    /// Prefix the error message with `context`
    fn with_context(self, context: &str) -> BTreeResult<T>;

    /// Prefix the error message with the name of the failing operation
    fn with_operation(self, operation: &str) -> BTreeResult<T>;
}

impl<T> BTreeResultExt<T> for Result<T, BPlusTreeError> {
    fn with_context(self, context: &str) -> BTreeResult<T> {
        self.map_err(|e| match e {
            BPlusTreeError::KeyNotFound => BPlusTreeError::KeyNotFound,
            BPlusTreeError::InvalidOrder(msg) => {
                BPlusTreeError::InvalidOrder(format!("{}: {}", context, msg))
            }
            BPlusTreeError::DataIntegrityError(msg) => {
                BPlusTreeError::data_integrity(context, &msg)
            }
            BPlusTreeError::CorruptedTree(msg) => {
                BPlusTreeError::CorruptedTree(format!("{}: {}", context, msg))
            }
        })
    }

    fn with_operation(self, operation: &str) -> BTreeResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_order_message() {
        let err = BPlusTreeError::invalid_order(3, 4);
        assert!(err.is_order_error());
        assert!(!err.is_structural());
        assert_eq!(
            err.to_string(),
            "Invalid order: Order 3 is invalid (minimum required: 4)"
        );
    }

    #[test]
    fn test_with_operation_prefixes_structural_errors() {
        let result: BTreeResult<()> =
            Err(BPlusTreeError::corrupted_tree("Leaf chain", "cycle at leaf 3"));
        let err = result.with_operation("remove").unwrap_err();
        assert!(err.is_structural());
        assert_eq!(
            err,
            BPlusTreeError::CorruptedTree(
                "Operation 'remove': Leaf chain corruption: cycle at leaf 3".to_string()
            )
        );
    }

    #[test]
    fn test_key_not_found_passes_through_context() {
        let result: KeyResult<u8> = Err(BPlusTreeError::KeyNotFound);
        assert_eq!(
            result.with_context("lookup"),
            Err(BPlusTreeError::KeyNotFound)
        );
    }
}

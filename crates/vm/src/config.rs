//! Machine limits, resolved once before a run.

/// Number of general-purpose registers.
pub const MAX_REGISTERS: usize = 16;

/// Default number of stack slots, including the unused slot 0.
pub const MAX_STACK_HEIGHT: usize = 2000;

/// Default bound on the lexical-level distance a static-link walk may cover.
pub const MAX_LEXI_LEVELS: usize = 3;

/// Default output channel capacity.
pub const MAX_OUTPUT_LENGTH: usize = 512;

/// Default cycle budget for one run.
pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

/// Slots in an activation record: return value, static link, dynamic link,
/// return address.
pub const FRAME_SIZE: usize = 4;

/// Limits for one machine. Read-only during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Stack slots including slot 0. Raised to `FRAME_SIZE + 1` if smaller.
    pub stack_height: usize,
    /// Largest `l` the frame resolver accepts.
    pub max_lexi_levels: usize,
    /// Output channel capacity.
    pub output_capacity: usize,
    /// Maximum number of cycles, `None` for unbounded.
    pub step_limit: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            stack_height: MAX_STACK_HEIGHT,
            max_lexi_levels: MAX_LEXI_LEVELS,
            output_capacity: MAX_OUTPUT_LENGTH,
            step_limit: Some(DEFAULT_STEP_LIMIT),
        }
    }
}

impl MachineConfig {
    /// The stack height actually allocated.
    pub fn effective_stack_height(&self) -> usize {
        self.stack_height.max(FRAME_SIZE + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MachineConfig::default();
        assert_eq!(config.stack_height, 2000);
        assert_eq!(config.max_lexi_levels, 3);
        assert_eq!(config.step_limit, Some(1_000_000));
    }

    #[test]
    fn tiny_stack_is_raised_to_one_frame() {
        let config = MachineConfig {
            stack_height: 1,
            ..MachineConfig::default()
        };
        assert_eq!(config.effective_stack_height(), 5);
    }
}

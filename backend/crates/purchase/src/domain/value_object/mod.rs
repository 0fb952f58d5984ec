pub mod authorization;
pub mod order_state;
pub mod reward_policy;

//! ERC-20 `transfer` call encoding.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// The slice of the ERC-20 interface the gateway calls.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// `selector || pad32(to) || pad32(amount)`.
pub fn encode_token_transfer(to: Address, amount: U256) -> Bytes {
    Bytes::from(IERC20::transferCall { to, amount }.abi_encode())
}

//! Canonical byte encodings for EVM transactions.
//!
//! Unsigned transactions travel as `0x02 || rlp(fields)`, the exact bytes an
//! EIP-1559 signature commits to. Signed transactions travel as EIP-2718
//! envelopes, the bytes `eth_sendRawTransaction` expects.

use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::{Decodable2718, Encodable2718};
use alloy::rlp::Decodable;

use crate::blockchain::types::CodecError;

/// EIP-2718 type byte of dynamic-fee transactions.
pub const EIP1559_TX_TYPE: u8 = 0x02;

pub fn encode_unsigned(tx: &TxEip1559) -> Vec<u8> {
    tx.encoded_for_signing()
}

pub fn decode_unsigned(bytes: &[u8]) -> Result<TxEip1559, CodecError> {
    let (&tx_type, mut body) = bytes
        .split_first()
        .ok_or_else(|| CodecError::Decode("empty input".to_string()))?;
    if tx_type != EIP1559_TX_TYPE {
        return Err(CodecError::UnsupportedType(tx_type));
    }

    let tx = <TxEip1559 as Decodable>::decode(&mut body).map_err(|e| CodecError::Decode(e.to_string()))?;
    if !body.is_empty() {
        return Err(CodecError::Decode(format!("{} trailing bytes", body.len())));
    }
    Ok(tx)
}

pub fn encode_signed(envelope: &TxEnvelope) -> Vec<u8> {
    envelope.encoded_2718()
}

pub fn decode_signed(bytes: &[u8]) -> Result<TxEnvelope, CodecError> {
    let mut buf = bytes;
    let envelope = TxEnvelope::decode_2718(&mut buf).map_err(|e| CodecError::Decode(e.to_string()))?;
    if !buf.is_empty() {
        return Err(CodecError::Decode(format!("{} trailing bytes", buf.len())));
    }
    Ok(envelope)
}

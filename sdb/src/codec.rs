//! Value / metadata codec
//! 值 / 元数据编解码器

use std::marker::PhantomData;

use bitcode::{DecodeOwned, Encode};

use crate::BoxErr;

/// Opaque serializer for row values and metadata
/// 行值与元数据的不透明序列化器
pub trait Codec: Send + Sync + 'static {
  type Val: Send + Sync + 'static;
  type Meta: Send + Sync + 'static;

  fn val_encode(&self, val: &Self::Val) -> Result<Vec<u8>, BoxErr>;
  fn val_decode(&self, bin: &[u8]) -> Result<Self::Val, BoxErr>;
  fn meta_encode(&self, meta: &Self::Meta) -> Result<Vec<u8>, BoxErr>;
  fn meta_decode(&self, bin: &[u8]) -> Result<Self::Meta, BoxErr>;
}

/// Codec backed by bitcode
/// 基于 bitcode 的编解码器
pub struct Bitcode<V, M = ()>(PhantomData<fn() -> (V, M)>);

impl<V, M> Bitcode<V, M> {
  #[inline]
  pub const fn new() -> Self {
    Self(PhantomData)
  }
}

impl<V, M> Default for Bitcode<V, M> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl<V, M> Codec for Bitcode<V, M>
where
  V: Encode + DecodeOwned + Send + Sync + 'static,
  M: Encode + DecodeOwned + Send + Sync + 'static,
{
  type Val = V;
  type Meta = M;

  #[inline]
  fn val_encode(&self, val: &V) -> Result<Vec<u8>, BoxErr> {
    Ok(bitcode::encode(val))
  }

  #[inline]
  fn val_decode(&self, bin: &[u8]) -> Result<V, BoxErr> {
    Ok(bitcode::decode(bin)?)
  }

  #[inline]
  fn meta_encode(&self, meta: &M) -> Result<Vec<u8>, BoxErr> {
    Ok(bitcode::encode(meta))
  }

  #[inline]
  fn meta_decode(&self, bin: &[u8]) -> Result<M, BoxErr> {
    Ok(bitcode::decode(bin)?)
  }
}

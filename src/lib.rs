//! `asterix-codec`: encode and decode EUROCONTROL ASTERIX surveillance-data
//! messages — the binary wire format radars, ADS-B receivers, and
//! multilateration systems use to exchange target reports, track updates,
//! and sensor status.
//!
//! The crate exposes a generic codec kernel (Data Block framing, the FSPEC
//! presence bitmap, and the per-item shape engine) driven by a per-category
//! User Application Profile (UAP) registry. Category-specific field layouts
//! live under [`protocol::uap`] and [`protocol::fields`].
/// Shared descriptor types bridging the UAP tables and the codec engine:
/// [`core::Category`], [`core::CategoryInfo`], [`core::ItemShape`],
/// [`core::DataFieldDescriptor`].
pub mod core;
/// Typed error taxonomy for bit-level, FSPEC, encoding, decoding, and
/// validation failures.
pub mod error;
/// Bit-level codec primitives (`BitReader`/`BitWriter`), the FSPEC codec,
/// the item-shape engine, and the `Field` trait contract.
pub mod infra;
/// Category registry, UAP tables, field library, `Record`, and `DataBlock`.
pub mod protocol;
mod decoder;
mod encoder;
/// Optional caller-supplied buffer pooling for repeated encode/decode calls.
pub mod pool;

pub use decoder::{DecodeCallback, Decoder};
pub use encoder::Encoder;

// SPDX-License-Identifier: GPL-3.0-or-later
// src/media/mod.rs
//
// Binary image payloads: renderable handles and decoding.

pub mod decode;
pub mod handle;

pub use decode::{DecodedImage, content_type_for_path, decode, decode_bytes, is_image_content_type};
pub use handle::{HandleId, HandleLedger, RenderHandle};

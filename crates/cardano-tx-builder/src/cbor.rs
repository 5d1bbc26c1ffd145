//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub use minicbor::{decode::Decode, encode::Encode};
pub use pallas_codec::minicbor::*;
use std::convert::Infallible;

/// Serialise into a fresh buffer. Writing to a `Vec` cannot fail, so neither can this.
pub trait ToCbor {
    fn to_cbor(&self) -> Vec<u8>;

    /// The serialised bytes, in base16.
    fn to_cbor_hex(&self) -> String {
        hex::encode(self.to_cbor())
    }
}

impl<T: Encode<()>> ToCbor for T {
    fn to_cbor(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        let _: Result<(), encode::Error<Infallible>> = encode(self, &mut buffer);
        buffer
    }
}

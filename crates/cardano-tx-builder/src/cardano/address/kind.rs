//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Type-level markers refining what an [`Address`](super::Address) is known to be.

/// Restricts the inhabitants of the kind parameter of [`Address`](super::Address); implemented
/// only by the markers below.
pub trait IsAddressKind: sealed::Sealed {}

mod sealed {
    pub trait Sealed {}
}

/// Any address, Byron or Shelley. This is what providers hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Any;
impl sealed::Sealed for Any {}
impl IsAddressKind for Any {}

/// A Byron (a.k.a bootstrap) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Byron;
impl sealed::Sealed for Byron {}
impl IsAddressKind for Byron {}

/// A Shelley address, with a payment credential and an optional delegation credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Shelley;
impl sealed::Sealed for Shelley {}
impl IsAddressKind for Shelley {}

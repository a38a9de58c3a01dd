//! SecureRegion Catalog
//!
//! Turns the binding's part selectors into the candidate regions for signing
//! and for encryption. Each call computes a fresh list from the same inputs,
//! so a list captured before encryption is planned stays valid afterwards.
//!
//! ## Rules
//!
//! | Selector             | Signed                        | Encrypted                      |
//! |----------------------|-------------------------------|--------------------------------|
//! | Body                 | `soap:Body`, Element          | `soap:Body`, Content           |
//! | Header               | Element, optional             | Element, optional              |
//! | Attachments          | Element (Content if content)  | Element (Content if content)   |
//! | Element path         | last segment, Element         | last segment, Element          |
//! | Content element path | -                             | last segment, Content          |

use crate::domain::entities::ProtectedRegion;
use crate::domain::value_objects::{Granularity, SoapVersion};
use crate::ports::outbound::AssertionSink;
use shared_policy::names::{assertions, ATTACHMENTS_REFERENCE};
use shared_policy::{AsymmetricBinding, ElementPath, MessageParts};

pub struct RegionCatalog<'a> {
    binding: &'a AsymmetricBinding,
    soap_version: SoapVersion,
    sink: &'a dyn AssertionSink,
}

impl<'a> RegionCatalog<'a> {
    pub fn new(
        binding: &'a AsymmetricBinding,
        soap_version: SoapVersion,
        sink: &'a dyn AssertionSink,
    ) -> Self {
        Self {
            binding,
            soap_version,
            sink,
        }
    }

    /// Regions eligible for signing, in selector order.
    pub fn signed_regions(&self) -> Vec<ProtectedRegion> {
        let parts = &self.binding.parts;
        let mut regions = Vec::new();

        if let Some(signed) = &parts.signed_parts {
            self.sink
                .assert(&self.binding.assertion(assertions::SIGNED_PARTS));
            regions.extend(self.part_regions(signed, Granularity::Element));
        }

        if let Some(paths) = &parts.signed_elements {
            self.sink
                .assert(&self.binding.assertion(assertions::SIGNED_ELEMENTS));
            regions.extend(element_regions(paths, Granularity::Element));
        }

        regions
    }

    /// Regions eligible for encryption, in selector order.
    pub fn encrypted_regions(&self) -> Vec<ProtectedRegion> {
        let parts = &self.binding.parts;
        let mut regions = Vec::new();

        if let Some(encrypted) = &parts.encrypted_parts {
            self.sink
                .assert(&self.binding.assertion(assertions::ENCRYPTED_PARTS));
            regions.extend(self.part_regions(encrypted, Granularity::Content));
        }

        if let Some(paths) = &parts.encrypted_elements {
            self.sink
                .assert(&self.binding.assertion(assertions::ENCRYPTED_ELEMENTS));
            regions.extend(element_regions(paths, Granularity::Element));
        }

        if let Some(paths) = &parts.content_encrypted_elements {
            self.sink.assert(
                &self
                    .binding
                    .assertion(assertions::CONTENT_ENCRYPTED_ELEMENTS),
            );
            regions.extend(element_regions(paths, Granularity::Content));
        }

        regions
    }

    fn part_regions(&self, parts: &MessageParts, body: Granularity) -> Vec<ProtectedRegion> {
        let mut regions = Vec::new();

        if parts.body {
            regions.push(ProtectedRegion {
                granularity: body,
                ..ProtectedRegion::element(self.soap_version.body())
            });
        }

        for header in &parts.headers {
            regions.push(ProtectedRegion::element(header.qname()).optional());
        }

        if let Some(attachments) = parts.attachments {
            let granularity = if attachments.content_only {
                Granularity::Content
            } else {
                Granularity::Element
            };
            regions.push(ProtectedRegion::external(ATTACHMENTS_REFERENCE, granularity).optional());
        }

        regions
    }
}

fn element_regions(paths: &[ElementPath], granularity: Granularity) -> Vec<ProtectedRegion> {
    paths
        .iter()
        .filter_map(|path| path.target())
        .map(|name| ProtectedRegion {
            granularity,
            ..ProtectedRegion::element(name.clone())
        })
        .collect()
}

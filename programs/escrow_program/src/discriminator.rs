//! Eight byte tags that prefix instruction payloads and account data.
//!
//! A tag is the first eight bytes of `sha256("<namespace>:<name>")`, with
//! namespace `global` for instructions and `account` for stored records, so
//! any client can recompute them from the names alone.

use sha2::Digest;
use sha2::Sha256;

/// Length of every discriminator.
pub const DISCRIMINATOR_LEN: usize = 8;

/// `sha256("global:make_offer")[..8]`
pub const MAKE_OFFER: [u8; DISCRIMINATOR_LEN] = [214, 98, 97, 35, 59, 12, 44, 178];
/// `sha256("global:take_offer")[..8]`
pub const TAKE_OFFER: [u8; DISCRIMINATOR_LEN] = [128, 156, 242, 207, 237, 192, 103, 240];
/// `sha256("account:Offer")[..8]`
pub const OFFER_ACCOUNT: [u8; DISCRIMINATOR_LEN] = [215, 88, 60, 71, 170, 162, 73, 229];

/// Tag of the instruction `name` (snake case).
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
	hashed("global", name)
}

/// Tag of the account type `name` (type name as written).
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
	hashed("account", name)
}

fn hashed(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
	let digest = Sha256::new()
		.chain_update(namespace)
		.chain_update(b":")
		.chain_update(name)
		.finalize();

	let mut discriminator = [0u8; DISCRIMINATOR_LEN];
	discriminator.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
	discriminator
}

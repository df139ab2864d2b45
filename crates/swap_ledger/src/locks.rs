use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Address;
use crate::TransactionError;

/// Per-account read/write locks.
///
/// An account may be held by any number of readers or by a single writer.
/// A lock set is taken all at once or not at all, so a waiting transaction
/// never holds anything another transaction needs.
#[derive(Debug, Default)]
struct AccountLocks {
	write: HashSet<Address>,
	read: HashMap<Address, usize>,
}

impl AccountLocks {
	/// The first key that conflicts with a lock already held.
	fn conflict(&self, keys: &[(Address, bool)]) -> Option<Address> {
		keys.iter()
			.find(|(address, writable)| {
				self.write.contains(address) || (*writable && self.read.contains_key(address))
			})
			.map(|(address, _)| *address)
	}

	fn lock(&mut self, keys: &[(Address, bool)]) {
		for (address, writable) in keys {
			if *writable {
				self.write.insert(*address);
			} else {
				*self.read.entry(*address).or_default() += 1;
			}
		}
	}

	fn unlock(&mut self, keys: &[(Address, bool)]) {
		for (address, writable) in keys {
			if *writable {
				self.write.remove(address);
				continue;
			}

			if let Some(count) = self.read.get_mut(address) {
				*count -= 1;
				if *count == 0 {
					self.read.remove(address);
				}
			}
		}
	}
}

/// The ledger's lock table and the signal raised whenever locks are
/// released.
#[derive(Debug, Default)]
pub(crate) struct LockTable {
	locks: Mutex<AccountLocks>,
	released: Condvar,
}

/// Holds the locks of one in-flight transaction and releases them on drop.
#[derive(Debug)]
pub struct AccountLockGuard<'a> {
	table: &'a LockTable,
	keys: Vec<(Address, bool)>,
}

impl<'a> AccountLockGuard<'a> {
	/// Take every lock in `keys`, waiting until none of them conflicts with
	/// a lock held elsewhere.
	pub(crate) fn acquire(table: &'a LockTable, keys: Vec<(Address, bool)>) -> Self {
		let locks = table.locks.lock().unwrap_or_else(PoisonError::into_inner);
		let mut locks = table
			.released
			.wait_while(locks, |locks| locks.conflict(&keys).is_some())
			.unwrap_or_else(PoisonError::into_inner);
		locks.lock(&keys);

		Self { table, keys }
	}

	/// Take every lock in `keys`, or report the first conflicting account
	/// without waiting.
	pub(crate) fn try_acquire(
		table: &'a LockTable,
		keys: Vec<(Address, bool)>,
	) -> Result<Self, TransactionError> {
		let mut locks = table.locks.lock().unwrap_or_else(PoisonError::into_inner);
		if let Some(address) = locks.conflict(&keys) {
			return Err(TransactionError::AccountInUse(address));
		}
		locks.lock(&keys);

		Ok(Self { table, keys })
	}

	pub fn keys(&self) -> &[(Address, bool)] {
		&self.keys
	}
}

impl Drop for AccountLockGuard<'_> {
	fn drop(&mut self) {
		self.table
			.locks
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.unlock(&self.keys);
		self.table.released.notify_all();
	}
}

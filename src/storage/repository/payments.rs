// SPDX-License-Identifier: AGPL-3.0-or-later

//! Payment record repository.
//!
//! This is the single storage boundary for payment records: card numbers and
//! CVVs are encrypted on every write and only leave ciphertext form through
//! the explicit decrypt accessors. The rest of the application never sees a
//! plaintext sensitive field unless it asks for one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::super::{FileStore, StorageError, StorageResult};
use crate::crypto::FieldCipher;

/// Maximum length for the card holder name.
const CARD_HOLDER_MAX_LEN: usize = 255;

/// Maximum plaintext length for the CVV.
const CVV_MAX_LEN: usize = 4;

/// Payment record as persisted.
///
/// `card_number` and `cvv` hold base64 ciphertext, never plaintext. Both are
/// optional at the storage level for legacy rows only; every write path
/// through this repository requires them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredPayment {
    /// Unique payment identifier (sequence-allocated)
    pub id: u64,
    /// Owning user; the record is deleted when the user is
    pub user_id: u64,
    /// Name on the card
    pub card_holder_name: String,
    /// Encrypted card number
    pub card_number: Option<String>,
    /// Expiry in MM/YY display format
    pub expiry_date: String,
    /// Encrypted CVV
    pub cvv: Option<String>,
    /// Payment amount, at most 2 fractional digits
    pub amount: Decimal,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Validated write input for a payment record.
///
/// Sensitive fields are plaintext here; they exist only transiently while the
/// repository encrypts them. `None` on update means "keep the stored
/// ciphertext".
#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub user_id: u64,
    pub card_holder_name: String,
    pub card_number: Option<String>,
    pub expiry_date: String,
    pub cvv: Option<String>,
    pub amount: Decimal,
}

/// Parse a raw amount string into a validated decimal.
///
/// The amount must be a non-negative decimal with at most 2 fractional
/// digits.
pub fn parse_amount(raw: &str) -> StorageResult<Decimal> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| StorageError::Validation(format!("amount {raw:?} is not a decimal number")))?;
    validate_amount(&amount)?;
    Ok(amount)
}

fn validate_amount(amount: &Decimal) -> StorageResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(StorageError::Validation(
            "amount must not be negative".to_string(),
        ));
    }
    if amount.scale() > 2 {
        return Err(StorageError::Validation(
            "amount must have at most 2 fractional digits".to_string(),
        ));
    }
    Ok(())
}

/// Check the MM/YY shape of an expiry date.
fn is_expiry_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 5
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'/'
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_digit()
}

/// Repository for payment record operations.
pub struct PaymentRepository<'a> {
    store: &'a FileStore,
    cipher: &'a FieldCipher,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new PaymentRepository.
    pub fn new(store: &'a FileStore, cipher: &'a FieldCipher) -> Self {
        Self { store, cipher }
    }

    /// Check if a payment record exists.
    pub fn exists(&self, payment_id: u64) -> bool {
        self.store.exists(self.store.paths().payment(payment_id))
    }

    /// Get a payment record by id.
    ///
    /// Sensitive fields on the returned record are ciphertext; use the
    /// decrypt accessors to recover plaintext.
    pub fn get(&self, payment_id: u64) -> StorageResult<StoredPayment> {
        let path = self.store.paths().payment(payment_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("payment {payment_id}")));
        }
        self.store.read_json(path)
    }

    /// Create a new payment record.
    ///
    /// Encrypts `card_number` and `cvv` before anything is written; both are
    /// required on this path.
    pub fn create(&self, input: &PaymentInput) -> StorageResult<StoredPayment> {
        self.validate(input, true)?;

        let card_number = input
            .card_number
            .as_deref()
            .ok_or_else(|| StorageError::Validation("card_number is required".to_string()))?;
        let cvv = input
            .cvv
            .as_deref()
            .ok_or_else(|| StorageError::Validation("cvv is required".to_string()))?;

        let id = self.store.next_id(self.store.paths().payments_dir())?;
        let now = Utc::now();
        let payment = StoredPayment {
            id,
            user_id: input.user_id,
            card_holder_name: input.card_holder_name.clone(),
            card_number: Some(self.cipher.encrypt(card_number)?),
            expiry_date: input.expiry_date.clone(),
            cvv: Some(self.cipher.encrypt(cvv)?),
            amount: input.amount,
            created_at: now,
            updated_at: now,
        };

        self.store
            .write_json(self.store.paths().payment(id), &payment)?;
        Ok(payment)
    }

    /// Update an existing payment record.
    ///
    /// Re-encrypts any sensitive field present in the input; an absent
    /// sensitive field keeps the stored ciphertext unchanged.
    pub fn update(&self, payment_id: u64, input: &PaymentInput) -> StorageResult<StoredPayment> {
        let existing = self.get(payment_id)?;
        self.validate(input, false)?;

        let card_number = match input.card_number.as_deref() {
            Some(plaintext) => Some(self.cipher.encrypt(plaintext)?),
            None => existing.card_number,
        };
        let cvv = match input.cvv.as_deref() {
            Some(plaintext) => Some(self.cipher.encrypt(plaintext)?),
            None => existing.cvv,
        };

        let payment = StoredPayment {
            id: payment_id,
            user_id: input.user_id,
            card_holder_name: input.card_holder_name.clone(),
            card_number,
            expiry_date: input.expiry_date.clone(),
            cvv,
            amount: input.amount,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.store
            .write_json(self.store.paths().payment(payment_id), &payment)?;
        Ok(payment)
    }

    /// Delete a payment record.
    pub fn delete(&self, payment_id: u64) -> StorageResult<()> {
        if !self.exists(payment_id) {
            return Err(StorageError::NotFound(format!("payment {payment_id}")));
        }
        self.store.delete(self.store.paths().payment(payment_id))
    }

    /// List all payment records, ordered by id.
    pub fn list_all(&self) -> StorageResult<Vec<StoredPayment>> {
        let mut ids: Vec<u64> = self
            .store
            .list_files(self.store.paths().payments_dir(), "json")?
            .into_iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        ids.sort_unstable();

        let mut payments = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(id) {
                Ok(payment) => payments.push(payment),
                // Degrade to the readable records, but leave a trace of the
                // one that vanished from the listing.
                Err(e) => {
                    tracing::warn!(
                        payment_id = id,
                        error = %e,
                        "skipping unreadable payment record"
                    );
                }
            }
        }
        Ok(payments)
    }

    /// List all payment records owned by a user, ordered by id.
    pub fn list_by_user(&self, user_id: u64) -> StorageResult<Vec<StoredPayment>> {
        let mut payments = self.list_all()?;
        payments.retain(|p| p.user_id == user_id);
        Ok(payments)
    }

    /// List payment records created at or after the cutoff instant.
    pub fn list_created_since(&self, cutoff: DateTime<Utc>) -> StorageResult<Vec<StoredPayment>> {
        let mut payments = self.list_all()?;
        payments.retain(|p| p.created_at >= cutoff);
        Ok(payments)
    }

    /// Delete all payment records owned by a user (cascade path).
    ///
    /// Returns the number of records removed.
    pub fn delete_by_user(&self, user_id: u64) -> StorageResult<usize> {
        let owned = self.list_by_user(user_id)?;
        let count = owned.len();
        for payment in owned {
            self.delete(payment.id)?;
        }
        Ok(count)
    }

    // ========== Sensitive Field Access ==========

    /// Decrypt the stored card number.
    pub fn decrypt_card_number(&self, payment: &StoredPayment) -> StorageResult<String> {
        let ciphertext = payment
            .card_number
            .as_deref()
            .ok_or_else(|| StorageError::NotFound(format!("payment {} card number", payment.id)))?;
        Ok(self.cipher.decrypt(ciphertext)?)
    }

    /// Decrypt the stored CVV.
    pub fn decrypt_cvv(&self, payment: &StoredPayment) -> StorageResult<String> {
        let ciphertext = payment
            .cvv
            .as_deref()
            .ok_or_else(|| StorageError::NotFound(format!("payment {} cvv", payment.id)))?;
        Ok(self.cipher.decrypt(ciphertext)?)
    }

    /// Masked display form of the card number: `**** **** **** ` plus the
    /// last 4 characters of the plaintext.
    pub fn masked_card_number(&self, payment: &StoredPayment) -> StorageResult<String> {
        let plaintext = self.decrypt_card_number(payment)?;
        let chars: Vec<char> = plaintext.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        Ok(format!("**** **** **** {tail}"))
    }

    // ========== Validation ==========

    fn validate(&self, input: &PaymentInput, require_sensitive: bool) -> StorageResult<()> {
        if input.card_holder_name.trim().is_empty() {
            return Err(StorageError::Validation(
                "card_holder_name is required".to_string(),
            ));
        }
        if input.card_holder_name.chars().count() > CARD_HOLDER_MAX_LEN {
            return Err(StorageError::Validation(format!(
                "card_holder_name must be at most {CARD_HOLDER_MAX_LEN} characters"
            )));
        }

        if !is_expiry_shape(&input.expiry_date) {
            return Err(StorageError::Validation(
                "expiry_date must match MM/YY".to_string(),
            ));
        }

        match input.card_number.as_deref() {
            Some(card) if card.is_empty() => {
                return Err(StorageError::Validation(
                    "card_number is required".to_string(),
                ));
            }
            None if require_sensitive => {
                return Err(StorageError::Validation(
                    "card_number is required".to_string(),
                ));
            }
            _ => {}
        }

        match input.cvv.as_deref() {
            Some(cvv) if cvv.is_empty() => {
                return Err(StorageError::Validation("cvv is required".to_string()));
            }
            Some(cvv) if cvv.chars().count() > CVV_MAX_LEN => {
                return Err(StorageError::Validation(format!(
                    "cvv must be at most {CVV_MAX_LEN} characters"
                )));
            }
            None if require_sensitive => {
                return Err(StorageError::Validation("cvv is required".to_string()));
            }
            _ => {}
        }

        validate_amount(&input.amount)?;

        if !self.store.exists(self.store.paths().user(input.user_id)) {
            return Err(StorageError::Validation(format!(
                "user {} does not exist",
                input.user_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::crypto::CryptoError;
    use crate::storage::repository::UserRepository;
    use crate::storage::StoragePaths;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, FieldCipher, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let mut store = FileStore::new(StoragePaths::new(dir.path()));
        store.initialize().expect("initialize");
        (store, FieldCipher::new(&[3u8; 32]), dir)
    }

    fn seed_user(store: &FileStore) -> u64 {
        UserRepository::new(store)
            .create("Jane Doe", vec![Role::Client])
            .unwrap()
            .id
    }

    fn test_input(user_id: u64) -> PaymentInput {
        PaymentInput {
            user_id,
            card_holder_name: "Jane Doe".to_string(),
            card_number: Some("4111111111111234".to_string()),
            expiry_date: "09/27".to_string(),
            cvv: Some("123".to_string()),
            amount: parse_amount("49.99").unwrap(),
        }
    }

    #[test]
    fn create_get_decrypt_round_trip() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let created = repo.create(&test_input(user_id)).unwrap();
        let loaded = repo.get(created.id).unwrap();

        // Stored fields are opaque ciphertext.
        assert_ne!(loaded.card_number.as_deref(), Some("4111111111111234"));
        assert_ne!(loaded.cvv.as_deref(), Some("123"));

        assert_eq!(repo.decrypt_card_number(&loaded).unwrap(), "4111111111111234");
        assert_eq!(repo.decrypt_cvv(&loaded).unwrap(), "123");
        assert_eq!(loaded.amount, parse_amount("49.99").unwrap());
    }

    #[test]
    fn masked_card_number_keeps_last_four() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let payment = repo.create(&test_input(user_id)).unwrap();
        assert_eq!(
            repo.masked_card_number(&payment).unwrap(),
            "**** **** **** 1234"
        );
    }

    #[test]
    fn update_missing_payment_is_not_found() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let result = repo.update(999, &test_input(user_id));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn update_without_sensitive_fields_keeps_ciphertext() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let created = repo.create(&test_input(user_id)).unwrap();

        let mut input = test_input(user_id);
        input.card_number = None;
        input.cvv = None;
        input.card_holder_name = "Jane A. Doe".to_string();
        let updated = repo.update(created.id, &input).unwrap();

        assert_eq!(updated.card_number, created.card_number);
        assert_eq!(updated.cvv, created.cvv);
        assert_eq!(updated.card_holder_name, "Jane A. Doe");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(repo.decrypt_card_number(&updated).unwrap(), "4111111111111234");
    }

    #[test]
    fn update_reencrypts_present_sensitive_fields() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let created = repo.create(&test_input(user_id)).unwrap();

        let mut input = test_input(user_id);
        input.card_number = Some("5500005555555559".to_string());
        input.cvv = Some("999".to_string());
        let updated = repo.update(created.id, &input).unwrap();

        assert_ne!(updated.card_number, created.card_number);
        assert_eq!(repo.decrypt_card_number(&updated).unwrap(), "5500005555555559");
        assert_eq!(repo.decrypt_cvv(&updated).unwrap(), "999");
        assert_eq!(
            repo.masked_card_number(&updated).unwrap(),
            "**** **** **** 5559"
        );
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let mut input = test_input(user_id);
        input.card_holder_name = "".to_string();
        assert!(matches!(
            repo.create(&input),
            Err(StorageError::Validation(_))
        ));

        let mut input = test_input(user_id);
        input.expiry_date = "2027-09".to_string();
        assert!(matches!(
            repo.create(&input),
            Err(StorageError::Validation(_))
        ));

        let mut input = test_input(user_id);
        input.cvv = Some("12345".to_string());
        assert!(matches!(
            repo.create(&input),
            Err(StorageError::Validation(_))
        ));

        let mut input = test_input(user_id);
        input.card_number = None;
        assert!(matches!(
            repo.create(&input),
            Err(StorageError::Validation(_))
        ));

        // Referenced user must exist.
        let input = test_input(999);
        assert!(matches!(
            repo.create(&input),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn amount_parsing_enforces_sign_and_scale() {
        assert!(parse_amount("49.99").is_ok());
        assert!(parse_amount("0").is_ok());
        assert!(parse_amount("0.5").is_ok());
        assert!(matches!(
            parse_amount("-1.00"),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(
            parse_amount("1.999"),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(
            parse_amount("forty"),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn delete_by_user_cascades() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let other_id = UserRepository::new(&store)
            .create("Other", vec![Role::Client])
            .unwrap()
            .id;
        let repo = PaymentRepository::new(&store, &cipher);

        let first = repo.create(&test_input(user_id)).unwrap();
        let second = repo.create(&test_input(user_id)).unwrap();
        let kept = repo.create(&test_input(other_id)).unwrap();

        assert_eq!(repo.delete_by_user(user_id).unwrap(), 2);
        assert!(matches!(repo.get(first.id), Err(StorageError::NotFound(_))));
        assert!(matches!(repo.get(second.id), Err(StorageError::NotFound(_))));
        assert!(repo.get(kept.id).is_ok());
    }

    #[test]
    fn list_created_since_filters_by_window() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let recent = repo.create(&test_input(user_id)).unwrap();
        let old = repo.create(&test_input(user_id)).unwrap();

        // Backdate one record past the window by rewriting it directly.
        let mut backdated = old.clone();
        backdated.created_at = Utc::now() - Duration::days(10);
        store
            .write_json(store.paths().payment(old.id), &backdated)
            .unwrap();

        let mut three_days = recent.clone();
        three_days.created_at = Utc::now() - Duration::days(3);
        store
            .write_json(store.paths().payment(recent.id), &three_days)
            .unwrap();

        let cutoff = Utc::now() - Duration::days(7);
        let listed = repo.list_created_since(cutoff).unwrap();
        let ids: Vec<u64> = listed.iter().map(|p| p.id).collect();
        assert!(ids.contains(&recent.id));
        assert!(!ids.contains(&old.id));
    }

    #[test]
    fn create_fails_instead_of_reusing_ids_after_sequence_corruption() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let first = repo.create(&test_input(user_id)).unwrap();

        std::fs::write(
            store.paths().sequence(store.paths().payments_dir()),
            "garbage",
        )
        .unwrap();

        let mut input = test_input(user_id);
        input.card_holder_name = "Mallory".to_string();
        assert!(repo.create(&input).is_err());

        // The existing record was never overwritten.
        let kept = repo.get(first.id).unwrap();
        assert_eq!(kept.card_holder_name, "Jane Doe");
    }

    #[test]
    fn list_all_skips_unreadable_records() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let broken = repo.create(&test_input(user_id)).unwrap();
        let intact = repo.create(&test_input(user_id)).unwrap();

        std::fs::write(store.paths().payment(broken.id), "{not json").unwrap();

        let listed = repo.list_all().unwrap();
        let ids: Vec<u64> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![intact.id]);
    }

    #[test]
    fn corrupted_ciphertext_surfaces_decrypt_error() {
        let (store, cipher, _dir) = test_store();
        let user_id = seed_user(&store);
        let repo = PaymentRepository::new(&store, &cipher);

        let mut payment = repo.create(&test_input(user_id)).unwrap();
        payment.card_number = Some("AAAAAAAAAAAAAAAAAAAAAAAA".to_string());
        store
            .write_json(store.paths().payment(payment.id), &payment)
            .unwrap();

        let loaded = repo.get(payment.id).unwrap();
        assert!(matches!(
            repo.masked_card_number(&loaded),
            Err(StorageError::Crypto(CryptoError::Decrypt))
        ));
    }
}

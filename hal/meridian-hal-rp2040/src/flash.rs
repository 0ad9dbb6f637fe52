//! Flash record storage for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage
//! in the last 64KB of flash.
//!
//! Implements the `RecordStore` trait from `meridian-hal`.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

// Re-export shared types from meridian-hal
pub use meridian_hal::flash::{RecordKey, StoreError};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico module
pub const RECORD_PARTITION_SIZE: usize = 64 * 1024; // 64KB for records
pub const RECORD_PARTITION_START: usize = FLASH_SIZE - RECORD_PARTITION_SIZE;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the record partition
pub const RECORD_RANGE: core::ops::Range<u32> =
    (RECORD_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer size for sequential-storage item handling
///
/// Records are a handful of bytes; the config blob is the largest.
const ITEM_BUFFER_SIZE: usize = 256;

/// RP2040 flash record storage
///
/// Every write goes straight to flash; there is no RAM write-back cache.
pub struct Rp2040RecordStore<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040RecordStore<'d> {
    /// Create a new record store instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }
}

impl<'d> meridian_hal::RecordStore for Rp2040RecordStore<'d> {
    async fn read(&mut self, key: RecordKey, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let mut item_buffer = [0u8; ITEM_BUFFER_SIZE];

        let result = map::fetch_item::<RecordKey, &[u8], _>(
            &mut self.flash,
            RECORD_RANGE,
            &mut NoCache::new(),
            &mut item_buffer,
            &key,
        )
        .await;

        match result {
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(StoreError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(StoreError::NotFound),
            Err(_) => Err(StoreError::Storage),
        }
    }

    async fn write(&mut self, key: RecordKey, data: &[u8]) -> Result<(), StoreError> {
        let mut item_buffer = [0u8; ITEM_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            RECORD_RANGE,
            &mut NoCache::new(),
            &mut item_buffer,
            &key,
            &data,
        )
        .await
        .map_err(|e| match e {
            sequential_storage::Error::FullStorage => StoreError::Full,
            sequential_storage::Error::Storage { .. } => StoreError::Flash,
            _ => StoreError::Storage,
        })
    }

    async fn exists(&mut self, key: RecordKey) -> bool {
        let mut item_buffer = [0u8; ITEM_BUFFER_SIZE];

        matches!(
            map::fetch_item::<RecordKey, &[u8], _>(
                &mut self.flash,
                RECORD_RANGE,
                &mut NoCache::new(),
                &mut item_buffer,
                &key,
            )
            .await,
            Ok(Some(_))
        )
    }

    async fn erase_all(&mut self) -> Result<(), StoreError> {
        self.flash
            .erase(RECORD_PARTITION_START as u32, FLASH_SIZE as u32)
            .await
            .map_err(|_| StoreError::Flash)
    }
}

/// Type alias used by the firmware
pub type RecordStore<'d> = Rp2040RecordStore<'d>;

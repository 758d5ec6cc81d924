// Get-info requests API

/// Get-info request id
pub const GET_INFO_REQ_ID: u8 = 0x01;

/// Every get-info object is served in blocks of this size
pub const GET_INFO_BLOCK_LEN: usize = 128;

/// Total size of the certificate store object
pub const CERT_STORE_SIZE_TOTAL: usize = 3840;
/// Version byte expected at the head of the certificate store
pub const CERT_STORE_VERSION: u8 = 0x01;
/// Number of certificates in the store
pub const NUM_CERTIFICATES: usize = 4;

/// Size of the chip-ID object
pub const CHIP_ID_SIZE: usize = 128;
/// Size of the RISC-V firmware version object
pub const RISCV_FW_VERSION_SIZE: usize = 4;
/// Size of the SPECT firmware version object
pub const SPECT_FW_VERSION_SIZE: usize = 4;

/// Firmware bank header sizes per bootloader generation; an empty bank
/// answers with no header at all
pub const FW_HEADER_SIZE_BOOT_V1: usize = 20;
pub const FW_HEADER_SIZE_BOOT_V2: usize = 52;
pub const FW_HEADER_SIZE_MAX: usize = FW_HEADER_SIZE_BOOT_V2;

/// Object identifiers readable through get-info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InfoObjectId {
    X509Cert = 0x00,
    ChipId = 0x01,
    RiscvFwVersion = 0x02,
    SpectFwVersion = 0x04,
    FwBank = 0xB0,
}

/// Build a get-info request payload
pub fn get_info_req(object_id: InfoObjectId, block_index: u8) -> [u8; 2] {
    [object_id as u8, block_index]
}

/// Certificates of the store, in store order
///
/// The device certificate carries the chip static X25519 public key used for
/// session establishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CertKind {
    Device = 0,
    Intermediate = 1,
    Tropic01Ca = 2,
    Root = 3,
}

/// Caller-owned certificate store
///
/// Wraps four buffers, one per certificate; the driver records how much of
/// each buffer it filled and never reads them back.
pub struct CertStore<'a> {
    certs: [&'a mut [u8]; NUM_CERTIFICATES],
    lens: [usize; NUM_CERTIFICATES],
}

impl<'a> CertStore<'a> {
    /// Wrap four certificate buffers in store order
    pub fn new(certs: [&'a mut [u8]; NUM_CERTIFICATES]) -> Self {
        Self {
            certs,
            lens: [0; NUM_CERTIFICATES],
        }
    }

    /// Written part of one certificate
    pub fn cert(&self, kind: CertKind) -> &[u8] {
        &self.certs[kind as usize][..self.lens[kind as usize]]
    }

    pub(crate) fn capacity(&self, idx: usize) -> usize {
        self.certs[idx].len()
    }

    pub(crate) fn len(&self, idx: usize) -> usize {
        self.lens[idx]
    }

    pub(crate) fn set_len(&mut self, idx: usize, len: usize) {
        self.lens[idx] = len;
    }

    pub(crate) fn chunk_mut(&mut self, idx: usize, offset: usize, len: usize) -> &mut [u8] {
        &mut self.certs[idx][offset..offset + len]
    }
}

/// Response for the chip-ID get-info object
///
/// Provisioning and identification data written during manufacturing. Field
/// offsets follow the chip-ID layout version 1.
pub struct ChipIdRsp([u8; CHIP_ID_SIZE]);

impl Default for ChipIdRsp {
    fn default() -> Self {
        Self::new()
    }
}

impl ChipIdRsp {
    /// Create a new response buffer
    pub fn new() -> Self {
        Self([0; CHIP_ID_SIZE])
    }

    /// Chip-ID layout version
    pub fn chip_id_ver(&self) -> &[u8] {
        &self.0[0..4]
    }

    /// First-level chip production data
    pub fn fl_chip_info(&self) -> &[u8] {
        &self.0[4..20]
    }

    /// Manufacturing functional test record
    pub fn func_test_info(&self) -> &[u8] {
        &self.0[20..28]
    }

    /// Silicon revision, four ASCII characters
    pub fn silicon_rev(&self) -> &[u8] {
        &self.0[28..32]
    }

    /// Package type identifier
    pub fn packg_type_id(&self) -> u16 {
        u16::from_be_bytes([self.0[32], self.0[33]])
    }

    /// Provisioning info version, fab id and part number id
    pub fn prov_ver_fab_id_pn(&self) -> &[u8] {
        &self.0[36..40]
    }

    /// Provisioning date
    pub fn provisioning_date(&self) -> &[u8] {
        &self.0[40..42]
    }

    /// HSM hardware/firmware/software version used during provisioning
    pub fn hsm_ver(&self) -> &[u8] {
        &self.0[42..46]
    }

    /// Programmer version
    pub fn prog_ver(&self) -> &[u8] {
        &self.0[46..50]
    }

    /// Serial number
    pub fn ser_num(&self) -> &[u8] {
        &self.0[52..68]
    }

    /// Long part number, length-prefixed ASCII
    pub fn part_number(&self) -> &[u8] {
        let len = (self.0[68] as usize).min(15);
        &self.0[69..69 + len]
    }

    /// Provisioning template version
    pub fn prov_templ_ver(&self) -> &[u8] {
        &self.0[84..86]
    }

    /// Provisioning template tag
    pub fn prov_templ_tag(&self) -> &[u8] {
        &self.0[86..90]
    }

    /// Provisioning specification version
    pub fn prov_spec_ver(&self) -> &[u8] {
        &self.0[90..92]
    }

    /// Provisioning specification tag
    pub fn prov_spec_tag(&self) -> &[u8] {
        &self.0[92..96]
    }

    /// Batch id
    pub fn batch_id(&self) -> &[u8] {
        &self.0[96..101]
    }
}

impl AsMut<[u8]> for ChipIdRsp {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

// GPT partition types and their MBR counterparts

use gpt_disk_types::GptPartitionType;
use uguid::{guid, Guid};

const LINUX_FILESYSTEM: Guid = guid!("0fc63daf-8483-4772-8e79-3d69d8477de4");
const LINUX_SWAP: Guid = guid!("0657fd6d-a4ab-43c4-84e5-0933c84b4f4f");

/// MBR type code given to partitions whose GPT type has no known mapping
pub const FALLBACK_MBR_TYPE: u8 = 0x83;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PartitionType {
    EfiSystem,
    LinuxFilesystem,
    LinuxSwap,
    BasicData,
    Unknown,
}

impl PartitionType {
    /// Convert from gpt_disk_types GUID to PartitionType
    pub fn from_gpt_guid(guid: &GptPartitionType) -> Self {
        if guid == &GptPartitionType::EFI_SYSTEM {
            PartitionType::EfiSystem
        } else if guid == &GptPartitionType::BASIC_DATA {
            PartitionType::BasicData
        } else if guid.0 == LINUX_FILESYSTEM {
            PartitionType::LinuxFilesystem
        } else if guid.0 == LINUX_SWAP {
            PartitionType::LinuxSwap
        } else {
            PartitionType::Unknown
        }
    }

    /// Convert to gpt_disk_types GUID
    pub fn to_gpt_guid(&self) -> GptPartitionType {
        match self {
            PartitionType::EfiSystem => GptPartitionType::EFI_SYSTEM,
            PartitionType::BasicData => GptPartitionType::BASIC_DATA,
            PartitionType::LinuxFilesystem => GptPartitionType(LINUX_FILESYSTEM),
            PartitionType::LinuxSwap => GptPartitionType(LINUX_SWAP),
            PartitionType::Unknown => GptPartitionType::UNUSED,
        }
    }

    /// Type code the partition gets in an MBR
    pub const fn mbr_type_code(&self) -> u8 {
        match self {
            PartitionType::EfiSystem => 0xEF,
            PartitionType::LinuxFilesystem => 0x83,
            PartitionType::LinuxSwap => 0x82,
            PartitionType::BasicData => 0x07,
            PartitionType::Unknown => FALLBACK_MBR_TYPE,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PartitionType::EfiSystem => "EFI System",
            PartitionType::LinuxFilesystem => "Linux FS",
            PartitionType::LinuxSwap => "Linux Swap",
            PartitionType::BasicData => "Basic Data",
            PartitionType::Unknown => "Unknown",
        }
    }
}

// smb/ntstatus.rs
// NTSTATUS names as printed by smbclient, and their numeric codes

pub const NT_STATUS_OK: u32 = 0x0000_0000;
pub const NT_STATUS_FAIL_CHECK: u32 = 0xC000_0229;

pub const OK_NAME: &str = "NT_STATUS_OK";
pub const FAIL_CHECK_NAME: &str = "NT_STATUS_FAIL_CHECK";

/// Prefix every status token starts with
pub const PREFIX: &str = "NT_STATUS_";

const TABLE: &[(&str, u32)] = &[
    ("NT_STATUS_OK", NT_STATUS_OK),
    ("NT_STATUS_BUFFER_OVERFLOW", 0x8000_0005),
    ("NT_STATUS_NO_MORE_FILES", 0x8000_0006),
    ("NT_STATUS_UNSUCCESSFUL", 0xC000_0001),
    ("NT_STATUS_NOT_IMPLEMENTED", 0xC000_0002),
    ("NT_STATUS_INVALID_HANDLE", 0xC000_0008),
    ("NT_STATUS_INVALID_PARAMETER", 0xC000_000D),
    ("NT_STATUS_NO_SUCH_FILE", 0xC000_000F),
    ("NT_STATUS_END_OF_FILE", 0xC000_0011),
    ("NT_STATUS_MORE_PROCESSING_REQUIRED", 0xC000_0016),
    ("NT_STATUS_NO_MEMORY", 0xC000_0017),
    ("NT_STATUS_ACCESS_DENIED", 0xC000_0022),
    ("NT_STATUS_BUFFER_TOO_SMALL", 0xC000_0023),
    ("NT_STATUS_OBJECT_NAME_INVALID", 0xC000_0033),
    ("NT_STATUS_OBJECT_NAME_NOT_FOUND", 0xC000_0034),
    ("NT_STATUS_OBJECT_NAME_COLLISION", 0xC000_0035),
    ("NT_STATUS_OBJECT_PATH_NOT_FOUND", 0xC000_003A),
    ("NT_STATUS_SHARING_VIOLATION", 0xC000_0043),
    ("NT_STATUS_DELETE_PENDING", 0xC000_0056),
    ("NT_STATUS_NO_SUCH_USER", 0xC000_0064),
    ("NT_STATUS_WRONG_PASSWORD", 0xC000_006A),
    ("NT_STATUS_LOGON_FAILURE", 0xC000_006D),
    ("NT_STATUS_PASSWORD_EXPIRED", 0xC000_0071),
    ("NT_STATUS_ACCOUNT_DISABLED", 0xC000_0072),
    ("NT_STATUS_DISK_FULL", 0xC000_007F),
    ("NT_STATUS_INSUFFICIENT_RESOURCES", 0xC000_009A),
    ("NT_STATUS_MEDIA_WRITE_PROTECTED", 0xC000_00A2),
    ("NT_STATUS_IO_TIMEOUT", 0xC000_00B5),
    ("NT_STATUS_FILE_IS_A_DIRECTORY", 0xC000_00BA),
    ("NT_STATUS_NOT_SUPPORTED", 0xC000_00BB),
    ("NT_STATUS_BAD_NETWORK_PATH", 0xC000_00BE),
    ("NT_STATUS_INVALID_NETWORK_RESPONSE", 0xC000_00C3),
    ("NT_STATUS_NETWORK_NAME_DELETED", 0xC000_00C9),
    ("NT_STATUS_NETWORK_ACCESS_DENIED", 0xC000_00CA),
    ("NT_STATUS_BAD_NETWORK_NAME", 0xC000_00CC),
    ("NT_STATUS_DIRECTORY_NOT_EMPTY", 0xC000_0101),
    ("NT_STATUS_NOT_A_DIRECTORY", 0xC000_0103),
    ("NT_STATUS_CANNOT_DELETE", 0xC000_0121),
    ("NT_STATUS_CONNECTION_DISCONNECTED", 0xC000_020C),
    ("NT_STATUS_CONNECTION_RESET", 0xC000_020D),
    ("NT_STATUS_NOT_FOUND", 0xC000_0225),
    ("NT_STATUS_FAIL_CHECK", NT_STATUS_FAIL_CHECK),
    ("NT_STATUS_CONNECTION_REFUSED", 0xC000_0236),
    ("NT_STATUS_HOST_UNREACHABLE", 0xC000_023D),
    ("NT_STATUS_PROTOCOL_UNREACHABLE", 0xC000_023E),
];

/// Numeric code for a status name, if it is one we know
pub fn lookup(name: &str) -> Option<u32> {
    TABLE
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, code)| *code)
}

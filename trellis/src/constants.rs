use std::mem::size_of;

/// Frame header size in contiguous bytes.
pub const FRAME_HEADER_SIZE: usize =
    // frame flag
    size_of::<u8>() +
        // payload length, big-endian
        size_of::<u32>();

/// High bit of the frame flag marks a trailer frame carrying status
/// metadata instead of a message.
pub const TRAILER_FLAG: u8 = 0x80;

/// Refuse frames beyond gRPC's default receive limit rather than
/// buffering an arbitrarily large length prefix.
pub const MAX_FRAME_SIZE: usize = 4 * 1024 * 1024;

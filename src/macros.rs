macro_rules! trace {
    ($($arg:tt)+) => {{
        #[cfg(feature = "defmt")]
        {
            defmt::trace!($($arg)+);
        }
    }};
}

macro_rules! debug {
    ($($arg:tt)+) => {{
        #[cfg(feature = "defmt")]
        {
            defmt::debug!($($arg)+);
        }
    }};
}

macro_rules! warn {
    ($($arg:tt)+) => {{
        #[cfg(feature = "defmt")]
        {
            defmt::warn!($($arg)+);
        }
    }};
}

/// Defines a fixed-size record with explicit field offsets.
///
/// Every record carries a `checksum: u8` at offset `checksum`. At compile
/// time every field must fit in `size`, and no two fields (checksum
/// included) may overlap.
///
/// Expands to a sealed `Record` impl, so it must be invoked inside
/// `record.rs`.
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident [size = $size:literal, checksum = $csum:literal] {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $ty:ty = $off:literal
            ),* $(,)?
        }
    ) => {
        paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            pub struct $name {
                $(
                    $(#[$fmeta])*
                    pub $field: $ty,
                )*
                /// XOR checksum over every other byte of the record
                pub checksum: u8,
            }

            impl $name {
                $(
                    #[doc = concat!("Byte offset of `", stringify!($field), "`")]
                    pub const [<$field:upper _OFFSET>]: usize = $off;
                )*
            }

            const _: () = assert!($crate::record::layout_fits(
                $size,
                $csum,
                &[$($off),*],
                &[$(<$ty as $crate::record::Field>::WIDTH),*],
            ));

            #[sealed::sealed]
            impl Record for $name {
                type Bytes = [u8; $size];

                const SIZE: usize = $size;
                const CHECKSUM_OFFSET: usize = $csum;

                fn decode(
                    bytes: &[u8],
                    endian: $crate::record::Endian,
                ) -> Result<Self, $crate::record::FrameError> {
                    if bytes.len() != $size {
                        return Err($crate::record::FrameError::Length {
                            expected: $size,
                            found: bytes.len(),
                        });
                    }

                    Ok(Self {
                        $(
                            $field: <$ty as $crate::record::Field>::read(&bytes[$off..], endian),
                        )*
                        checksum: bytes[$csum],
                    })
                }

                fn encode(
                    &self,
                    out: &mut [u8],
                    endian: $crate::record::Endian,
                ) -> Result<usize, $crate::record::FrameError> {
                    if out.len() < $size {
                        return Err($crate::record::FrameError::Length {
                            expected: $size,
                            found: out.len(),
                        });
                    }

                    out[..$size].copy_from_slice(&self.to_bytes(endian));

                    Ok($size)
                }

                fn to_bytes(&self, endian: $crate::record::Endian) -> [u8; $size] {
                    let mut out = [0; $size];
                    $(
                        <$ty as $crate::record::Field>::write(self.$field, &mut out[$off..], endian);
                    )*
                    out[$csum] = self.checksum;

                    out
                }

                fn checksum(&self) -> u8 {
                    self.checksum
                }

                fn with_checksum(self, checksum: u8) -> Self {
                    Self { checksum, ..self }
                }
            }
        }
    };
}

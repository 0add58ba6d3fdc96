// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A macro to define fixed-width bitflag types usable in `const` contexts.

/// Declares a bitflag newtype over an unsigned integer.
///
/// Every operation the generated type exposes is a `const fn`, so flag sets can be
/// combined and inspected inside constant items and static assertions.
#[macro_export]
#[doc(hidden)]
macro_rules! vitrum_bitflags {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $ty:ty {
            $(
                $(#[$flag_attr:meta])*
                const $flag_name:ident = $flag_value:expr;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
        $vis struct $name {
            bits: $ty,
        }

        impl $name {
            /// An empty set of flags.
            pub const EMPTY: Self = Self { bits: 0 };

            $(
                $(#[$flag_attr])*
                pub const $flag_name: Self = Self { bits: $flag_value };
            )*

            /// Creates a flag set from raw bits, keeping bits that name no declared flag.
            pub const fn from_bits_retain(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw value of the flag set.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Returns `true` if no bit is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }

            /// Returns `true` if all flags in `other` are contained within `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Returns `true` if any flag in `other` is contained within `self`.
            pub const fn intersects(&self, other: Self) -> bool {
                (self.bits & other.bits) != 0
            }

            /// Returns the union of both sets.
            #[must_use]
            pub const fn union(self, other: Self) -> Self {
                Self { bits: self.bits | other.bits }
            }

            /// Returns the bits present in both sets.
            #[must_use]
            pub const fn intersection(self, other: Self) -> Self {
                Self { bits: self.bits & other.bits }
            }

            /// Returns `self` with the bits of `other` cleared.
            #[must_use]
            pub const fn difference(self, other: Self) -> Self {
                Self { bits: self.bits & !other.bits }
            }

            /// Inserts the flags in `other` into `self`.
            pub fn insert(&mut self, other: Self) {
                self.bits |= other.bits;
            }

            /// Removes the flags in `other` from `self`.
            pub fn remove(&mut self, other: Self) {
                self.bits &= !other.bits;
            }
        }

        impl ::core::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, other: Self) -> Self {
                self.union(other)
            }
        }

        impl ::core::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, other: Self) -> Self {
                self.intersection(other)
            }
        }

        impl ::core::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, other: Self) {
                self.bits |= other.bits;
            }
        }

        impl ::core::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, other: Self) {
                self.bits &= other.bits;
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let mut remaining = self.bits;
                let mut first = true;

                write!(f, "{} {{ ", stringify!($name))?;

                $(
                    // Zero-valued and composite flags are skipped once their bits are consumed.
                    let flag_bits = Self::$flag_name.bits;
                    if flag_bits != 0 && (remaining & flag_bits) == flag_bits {
                        if !first {
                            write!(f, " | ")?;
                        }
                        write!(f, "{}", stringify!($flag_name))?;
                        remaining &= !flag_bits;
                        first = false;
                    }
                )*

                if remaining != 0 {
                    if !first {
                        write!(f, " | ")?;
                    }
                    write!(f, "{:#x}", remaining)?;
                    first = false;
                }

                if first {
                    write!(f, "EMPTY")?;
                }

                write!(f, " }}")
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::vitrum_bitflags;

    vitrum_bitflags! {
        /// Flags used to exercise the macro.
        pub struct TestFlags: u16 {
            const FLAG_A = 1 << 0;
            const FLAG_B = 1 << 1;
            const FLAG_C = 1 << 2;
            const COMBINED_AC = Self::FLAG_A.bits() | Self::FLAG_C.bits();
        }
    }

    #[test]
    fn empty_flags() {
        let flags = TestFlags::EMPTY;
        assert!(flags.is_empty());
        assert_eq!(TestFlags::default(), TestFlags::EMPTY);
        assert_eq!(format!("{flags:?}"), "TestFlags { EMPTY }");
    }

    #[test]
    fn union_and_contains() {
        let flags = TestFlags::FLAG_A | TestFlags::FLAG_C;
        assert_eq!(flags.bits(), 0b101);
        assert!(flags.contains(TestFlags::FLAG_A));
        assert!(!flags.contains(TestFlags::FLAG_B));
        assert!(flags.contains(TestFlags::COMBINED_AC));
        assert!(flags.intersects(TestFlags::FLAG_C | TestFlags::FLAG_B));
    }

    #[test]
    fn const_operations() {
        const AB: TestFlags = TestFlags::FLAG_A.union(TestFlags::FLAG_B);
        const ONLY_B: TestFlags = AB.difference(TestFlags::FLAG_A);
        assert_eq!(AB.bits(), 0b011);
        assert_eq!(ONLY_B, TestFlags::FLAG_B);
        assert_eq!(AB.intersection(TestFlags::FLAG_B), TestFlags::FLAG_B);
    }

    #[test]
    fn insert_and_remove() {
        let mut flags = TestFlags::EMPTY;
        flags.insert(TestFlags::FLAG_B);
        flags |= TestFlags::FLAG_C;
        assert_eq!(flags.bits(), 0b110);
        flags.remove(TestFlags::FLAG_B);
        assert_eq!(flags, TestFlags::FLAG_C);
    }

    #[test]
    fn debug_lists_named_then_unknown_bits() {
        assert_eq!(
            format!("{:?}", TestFlags::FLAG_A | TestFlags::FLAG_B),
            "TestFlags { FLAG_A | FLAG_B }"
        );
        let unknown = TestFlags::from_bits_retain(0b1000_0001);
        assert_eq!(format!("{unknown:?}"), "TestFlags { FLAG_A | 0x80 }");
    }
}

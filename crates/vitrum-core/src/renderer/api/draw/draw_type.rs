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


//! Draw-type bits used to dispatch and cache by rendering technique.
//!
//! [`DrawTypeFlags`] is the stable, public vocabulary of draw kinds. The
//! [`internal`] module extends it with bits for techniques that take part in the
//! same dispatch and pipeline caching but are not part of the public surface.
//! Internal bits start directly above [`DrawTypeFlags::LAST`] and must stay within
//! the 16-bit storage; that is checked at compile time by [`internal_draw_types!`].
//!
//! [`internal_draw_types!`]: crate::internal_draw_types

use crate::vitrum_bitflags;

vitrum_bitflags! {
    /// The public set of draw kinds, packed into a 16-bit mask.
    pub struct DrawTypeFlags: u16 {
        /// No draw kind.
        const NONE = 0;
        /// Text rendered from an A8 glyph atlas.
        const BITMAP_TEXT_MASK = 1 << 0;
        /// Text rendered from an LCD subpixel glyph atlas.
        const BITMAP_TEXT_LCD = 1 << 1;
        /// Color glyphs (emoji) rendered from an RGBA atlas.
        const BITMAP_TEXT_COLOR = 1 << 2;
        /// Text rendered from signed distance field glyphs.
        const SDF_TEXT = 1 << 3;
        /// Signed distance field text with LCD subpixel coverage.
        const SDF_TEXT_LCD = 1 << 4;
        /// Arbitrary vertex meshes.
        const DRAW_VERTICES = 1 << 5;
        /// Circular arcs drawn analytically.
        const CIRCULAR_ARC = 1 << 6;
        /// Rects, rounded rects and quads handled by the analytic shape steps.
        const SIMPLE_SHAPE = 1 << 7;
        /// Paths and other geometry needing tessellation or stencil-and-cover.
        const NON_SIMPLE_SHAPE = 1 << 8;

        /// The highest public bit. Internal bits are allocated above it.
        const LAST = Self::NON_SIMPLE_SHAPE.bits();

        /// Every bitmap text variant.
        const BITMAP_TEXT = Self::BITMAP_TEXT_MASK.bits()
            | Self::BITMAP_TEXT_LCD.bits()
            | Self::BITMAP_TEXT_COLOR.bits();
        /// Every text variant, bitmap or SDF.
        const TEXT = Self::BITMAP_TEXT.bits() | Self::SDF_TEXT.bits() | Self::SDF_TEXT_LCD.bits();
        /// Every public bit.
        const ALL_PUBLIC = (Self::LAST.bits() << 1) - 1;
    }
}

impl DrawTypeFlags {
    /// The number of bits available to public and internal draw types together.
    pub const WIDTH: u32 = u16::BITS;

    /// Returns `true` if any internal-only bit is set.
    pub const fn is_internal(&self) -> bool {
        !self.difference(Self::ALL_PUBLIC).is_empty()
    }

    /// Returns only the public bits of this mask.
    #[must_use]
    pub const fn public_part(self) -> Self {
        self.intersection(Self::ALL_PUBLIC)
    }

    /// Returns only the internal bits of this mask.
    #[must_use]
    pub const fn internal_part(self) -> Self {
        self.difference(Self::ALL_PUBLIC)
    }
}

/// Declares internal draw-type bits as left shifts of [`DrawTypeFlags::LAST`].
///
/// Entries name their shift amounts, which must run 1, 2, 3, ... so every entry
/// takes exactly the next free bit. The closing `@last` entry names the highest
/// bit. The macro emits the constants together with static assertions, so an
/// extension that no longer fits the 16-bit mask, skips or reuses a bit, or
/// misreports its highest bit fails to build.
///
/// ```
/// mod extra {
///     vitrum_core::internal_draw_types! {
///         FIRST = 1;
///         SECOND = 2;
///         @last = SECOND;
///     }
/// }
/// assert_eq!(extra::LAST_INTERNAL.bits(), 1 << 10);
/// ```
///
/// Running past the width:
///
/// ```compile_fail
/// mod extra {
///     vitrum_core::internal_draw_types! {
///         A = 1; B = 2; C = 3; D = 4; E = 5; F = 6; G = 7;
///         /// One bit too far.
///         TOO_WIDE = 8;
///         @last = TOO_WIDE;
///     }
/// }
/// ```
///
/// Skipping a bit:
///
/// ```compile_fail
/// mod extra {
///     vitrum_core::internal_draw_types! {
///         A = 1;
///         B = 3;
///         @last = B;
///     }
/// }
/// ```
#[macro_export]
#[doc(hidden)]
macro_rules! internal_draw_types {
    (
        $(
            $(#[$attr:meta])*
            $name:ident = $shift:literal;
        )+
        @last = $last:ident;
    ) => {
        $(
            $(#[$attr])*
            pub const $name: $crate::renderer::api::draw::DrawTypeFlags =
                $crate::renderer::api::draw::DrawTypeFlags::from_bits_retain(
                    (($crate::renderer::api::draw::DrawTypeFlags::LAST.bits() as u32) << $shift) as u16,
                );

            const _: () = assert!(
                $shift >= 1,
                "internal draw types must live above DrawTypeFlags::LAST"
            );
            const _: () = assert!(
                (($crate::renderer::api::draw::DrawTypeFlags::LAST.bits() as u32) << $shift)
                    <= 1 << ($crate::renderer::api::draw::DrawTypeFlags::WIDTH - 1),
                "DrawTypeFlags do not fit in 16 bits"
            );
            const _: () = assert!(
                $name.bits() <= LAST_INTERNAL.bits(),
                "LAST_INTERNAL must be the highest internal draw type"
            );
        )+

        /// The highest internal draw-type bit in use.
        pub const LAST_INTERNAL: $crate::renderer::api::draw::DrawTypeFlags = $last;

        /// Every internal draw-type bit.
        pub const ALL_INTERNAL: $crate::renderer::api::draw::DrawTypeFlags =
            $crate::renderer::api::draw::DrawTypeFlags::EMPTY$(.union($name))+;

        const _: () = assert!(
            ALL_INTERNAL.bits().count_ones() as usize == [$($shift),+].len(),
            "internal draw types must not share a bit"
        );
        const _: () = {
            let last = $crate::renderer::api::draw::DrawTypeFlags::LAST.bits() as u32;
            let count = [$($shift),+].len() as u32;
            let expected = ((last << (count + 1)) - 1) & !((last << 1) - 1);
            assert!(
                ALL_INTERNAL.bits() as u32 == expected && LAST_INTERNAL.bits() as u32 == last << count,
                "internal draw types must take consecutive bits directly above DrawTypeFlags::LAST"
            );
        };
    };
}

/// Draw types only meaningful inside the renderer.
///
/// These bits participate in technique dispatch and pipeline caching exactly like
/// the public ones, but callers outside the renderer never see them.
#[doc(hidden)]
pub mod internal {
    crate::internal_draw_types! {
        /// Geometry rasterized into a coverage mask first and then drawn as a textured rect.
        COVERAGE_MASK = 1;
        /// Rounded rects drawn with the analytic rrect step instead of generic shapes.
        ANALYTIC_RRECT = 2;
        @last = ANALYTIC_RRECT;
    }
}

#[cfg(test)]
mod tests {
    use super::internal::{ALL_INTERNAL, ANALYTIC_RRECT, COVERAGE_MASK, LAST_INTERNAL};
    use super::*;

    #[test]
    fn public_bits_are_single_and_distinct() {
        let singles = [
            DrawTypeFlags::BITMAP_TEXT_MASK,
            DrawTypeFlags::BITMAP_TEXT_LCD,
            DrawTypeFlags::BITMAP_TEXT_COLOR,
            DrawTypeFlags::SDF_TEXT,
            DrawTypeFlags::SDF_TEXT_LCD,
            DrawTypeFlags::DRAW_VERTICES,
            DrawTypeFlags::CIRCULAR_ARC,
            DrawTypeFlags::SIMPLE_SHAPE,
            DrawTypeFlags::NON_SIMPLE_SHAPE,
        ];
        let mut union = DrawTypeFlags::EMPTY;
        for flag in singles {
            assert_eq!(flag.bits().count_ones(), 1, "{flag:?} is not a single bit");
            assert!(!union.intersects(flag), "{flag:?} reuses a bit");
            union |= flag;
        }
        assert_eq!(union, DrawTypeFlags::ALL_PUBLIC);
        assert_eq!(DrawTypeFlags::NONE, DrawTypeFlags::EMPTY);
    }

    #[test]
    fn internal_bits_extend_above_last_public_bit() {
        assert_eq!(COVERAGE_MASK.bits(), DrawTypeFlags::LAST.bits() << 1);
        assert_eq!(ANALYTIC_RRECT.bits(), DrawTypeFlags::LAST.bits() << 2);
        assert!(COVERAGE_MASK.bits() < ANALYTIC_RRECT.bits());
        assert_eq!(LAST_INTERNAL, ANALYTIC_RRECT);
    }

    #[test]
    fn last_internal_fits_width() {
        assert!(LAST_INTERNAL.bits() > DrawTypeFlags::LAST.bits());
        assert!(u32::from(LAST_INTERNAL.bits()) <= 1 << (DrawTypeFlags::WIDTH - 1));
    }

    #[test]
    fn internal_bits_never_collide() {
        assert_ne!(COVERAGE_MASK, ANALYTIC_RRECT);
        assert_eq!(ALL_INTERNAL.bits().count_ones(), 2);
        assert!(!ALL_INTERNAL.intersects(DrawTypeFlags::ALL_PUBLIC));
    }

    #[test]
    fn masks_split_into_public_and_internal_parts() {
        let mixed = DrawTypeFlags::SIMPLE_SHAPE | COVERAGE_MASK;
        assert!(mixed.is_internal());
        assert_eq!(mixed.public_part(), DrawTypeFlags::SIMPLE_SHAPE);
        assert_eq!(mixed.internal_part(), COVERAGE_MASK);
        assert!(!DrawTypeFlags::TEXT.is_internal());
    }

    #[test]
    fn text_groups() {
        assert!(DrawTypeFlags::TEXT.contains(DrawTypeFlags::BITMAP_TEXT));
        assert!(DrawTypeFlags::TEXT.contains(DrawTypeFlags::SDF_TEXT_LCD));
        assert!(!DrawTypeFlags::TEXT.intersects(DrawTypeFlags::DRAW_VERTICES));
    }
}

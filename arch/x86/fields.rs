use core::fmt;

use ldasm_core::impl_field;

macro_rules! byte_view {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(u8);

        impl $name {
            pub const fn new(raw: u8) -> Self {
                Self(raw)
            }

            pub const fn raw(&self) -> u8 {
                self.0
            }
        }

        impl From<u8> for $name {
            fn from(raw: u8) -> Self {
                Self(raw)
            }
        }
    };
}

byte_view! {
    /// ModRM byte.
    ModRM
}

impl ModRM {
    impl_field! {
        pub mod_ = 6, 2, u8;
        pub reg = 3, 3, u8;
        pub rm = 0, 3, u8;
    }

    /// Register-direct form.
    pub fn is_register(&self) -> bool {
        self.mod_() == 3
    }
}

impl fmt::Debug for ModRM {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("ModRM")
            .field("mod", &self.mod_())
            .field("reg", &self.reg())
            .field("rm", &self.rm())
            .finish()
    }
}

byte_view! {
    /// SIB byte.
    Sib
}

impl Sib {
    impl_field! {
        pub scale = 6, 2, u8;
        pub index = 3, 3, u8;
        pub base = 0, 3, u8;
    }
}

impl fmt::Debug for Sib {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Sib")
            .field("scale", &self.scale())
            .field("index", &self.index())
            .field("base", &self.base())
            .finish()
    }
}

byte_view! {
    /// REX prefix byte (0x40..=0x4f).
    Rex
}

impl Rex {
    impl_field! {
        pub w = 3, 1, bool;
        pub r = 2, 1, bool;
        pub x = 1, 1, bool;
        pub b = 0, 1, bool;
    }
}

impl fmt::Debug for Rex {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Rex")
            .field("w", &self.w())
            .field("r", &self.r())
            .field("x", &self.x())
            .field("b", &self.b())
            .finish()
    }
}

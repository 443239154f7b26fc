pub mod fmt {
    use crate::result::Result;
    use crate::string::String;

    pub struct Error;

    pub struct Formatter<'a> {
        buf: &'a mut String,
    }

    pub trait Write {
        fn write_str(&mut self, s: &str) -> Result<(), Error>;

        fn write_char(&mut self, c: char) -> Result<(), Error> {
            loop {}
        }
    }

    pub trait Display {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error>;
    }

    pub trait Debug {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error>;
    }

    impl Write for String {
        fn write_str(&mut self, s: &str) -> Result<(), Error> {
            loop {}
        }
    }

    impl<T: ?Sized + Display> Display for &T {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }

    impl<T: ?Sized + Debug> Debug for &T {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
            loop {}
        }
    }
}

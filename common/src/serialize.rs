//
// Copyright 2026 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Allows the serialization of datastructures to Vec<u8>.

pub trait Writer {
    fn written_len(&self) -> usize;
    fn write(&self, out: &mut dyn Writable);
    fn to_vec(&self) -> Vec<u8> {
        let mut vec = Vec::with_capacity(self.written_len());
        self.write(&mut vec);
        vec
    }
}

// Like std::io::Write but can't fail or only do partial writes.
pub trait Writable {
    fn write(&mut self, input: &[u8]);
}

impl Writable for Vec<u8> {
    fn write(&mut self, input: &[u8]) {
        self.extend_from_slice(input);
    }
}

impl<T: Writer> Writer for Option<T> {
    fn written_len(&self) -> usize {
        match self {
            None => 0,
            Some(writer) => writer.written_len(),
        }
    }
    fn write(&self, out: &mut dyn Writable) {
        match self {
            None => {}
            Some(writer) => writer.write(out),
        }
    }
}

// We don't impl u8 directly so as to avoid a conflict between [u8] and [T: Writer]
impl<const N: usize> Writer for [u8; N] {
    fn written_len(&self) -> usize {
        self.len()
    }
    fn write(&self, out: &mut dyn Writable) {
        out.write(&self[..]);
    }
}

impl Writer for [u8] {
    fn written_len(&self) -> usize {
        self.len()
    }
    fn write(&self, out: &mut dyn Writable) {
        out.write(self);
    }
}

impl Writer for Vec<u8> {
    fn written_len(&self) -> usize {
        self.len()
    }
    fn write(&self, out: &mut dyn Writable) {
        out.write(&self[..]);
    }
}

impl Writer for u16 {
    fn written_len(&self) -> usize {
        2
    }
    fn write(&self, out: &mut dyn Writable) {
        self.to_be_bytes().write(out)
    }
}

impl Writer for u32 {
    fn written_len(&self) -> usize {
        4
    }
    fn write(&self, out: &mut dyn Writable) {
        self.to_be_bytes().write(out)
    }
}

macro_rules! impl_writer_tuple {
    ($($name:ident)+) => (
    impl<$($name: Writer),+> Writer for ($($name,)+) {
        #[allow(non_snake_case)]
        fn written_len(&self) -> usize {
            let ($(ref $name,)+) = *self;
            let mut len = 0;
            $(len += $name.written_len();)+
            len
        }
        #[allow(non_snake_case)]
        fn write(&self, out: &mut dyn Writable) {
            let ($(ref $name,)+) = *self;
            $($name.write(out);)+
        }
    });
}

impl_writer_tuple! { A }
impl_writer_tuple! { A B }
impl_writer_tuple! { A B C }
impl_writer_tuple! { A B C D }
impl_writer_tuple! { A B C D E }

impl<T: Writer, const N: usize> Writer for [T; N] {
    fn written_len(&self) -> usize {
        self.iter().map(|writable| writable.written_len()).sum()
    }
    fn write(&self, out: &mut dyn Writable) {
        for writable in self {
            writable.write(out);
        }
    }
}

impl<T: Writer> Writer for [T] {
    fn written_len(&self) -> usize {
        self.iter().map(|writable| writable.written_len()).sum()
    }
    fn write(&self, out: &mut dyn Writable) {
        for writable in self {
            writable.write(out);
        }
    }
}

impl<T: Writer> Writer for Vec<T> {
    fn written_len(&self) -> usize {
        self.iter().map(|writable| writable.written_len()).sum()
    }
    fn write(&self, out: &mut dyn Writable) {
        for writable in self {
            writable.write(out);
        }
    }
}

// Necessary for composition with other impls (such as tuples).
impl<T: Writer + ?Sized> Writer for &T {
    fn written_len(&self) -> usize {
        T::written_len(self)
    }

    fn write(&self, out: &mut dyn Writable) {
        T::write(self, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16() {
        assert_eq!("0064", hex::encode(100u16.to_vec()));
        assert_eq!("ffff", hex::encode(65535u16.to_vec()));
        assert_eq!(2, 100u16.written_len());
    }

    #[test]
    fn u32() {
        assert_eq!("00000064", hex::encode(100u32.to_vec()));
        assert_eq!("7e8a6925", hex::encode(2_123_000_101u32.to_vec()));
        assert_eq!(4, 100u32.written_len());
    }

    #[test]
    fn slices_of_u8() {
        let array = [1u8, 2u8, 255u8];
        assert_eq!(3, array.written_len());
        assert_eq!("0102ff", hex::encode(array.to_vec()));
        assert_eq!("0102ff", hex::encode(array[..].to_vec()));

        let vec = vec![1u8, 2u8, 255u8];
        assert_eq!("0102ff", hex::encode(Writer::to_vec(&vec)));
    }

    #[test]
    fn option() {
        assert_eq!(0, None::<u16>.written_len());
        assert_eq!("", hex::encode(None::<u16>.to_vec()));
        assert_eq!(2, Some(100u16).written_len());
        assert_eq!("0064", hex::encode(Some(100u16).to_vec()));
    }

    #[test]
    fn tuple2() {
        let tuple = (100u16, 2_123_000_101u32);
        assert_eq!(6, tuple.written_len());
        assert_eq!("00647e8a6925", hex::encode(tuple.to_vec()));
    }

    #[test]
    fn tuple5() {
        let tuple = ([0x90u8, 0x60u8], 5u16, 1000u32, 7u32, [0xabu8]);
        assert_eq!(13, tuple.written_len());
        assert_eq!("90600005000003e800000007ab", hex::encode(tuple.to_vec()));
    }

    #[test]
    fn nested_tuples() {
        let tuple = ((1u16, 2u16), ([3u8], &[4u8, 5u8][..]));
        assert_eq!(7, tuple.written_len());
        assert_eq!("00010002030405", hex::encode(tuple.to_vec()));
    }

    #[test]
    fn vec_of_u32() {
        let vec = vec![1u32, 1 << 31];
        assert_eq!(8, vec.written_len());
        assert_eq!("0000000180000000", hex::encode(vec.to_vec()));
    }

    #[test]
    fn array_and_slice_of_u32() {
        let array = [1u32, 1 << 31];
        assert_eq!(8, array.written_len());
        assert_eq!("0000000180000000", hex::encode(array.to_vec()));
        assert_eq!(8, array[..].written_len());
        assert_eq!("0000000180000000", hex::encode(Writer::to_vec(&array[..])));
    }

    #[test]
    fn dynamic_vec() {
        let mut vec: Vec<&dyn Writer> = vec![&[127u8]];
        vec.push(&65535u16);
        vec.push(&1_000_000_000u32);
        assert_eq!(7, vec.written_len());
        assert_eq!("7fffff3b9aca00", hex::encode(vec.to_vec()));
    }
}

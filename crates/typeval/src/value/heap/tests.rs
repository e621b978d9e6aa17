use super::*;

#[test]
fn clones_share_allocation() {
    let a = Heap::new(vec![1, 2, 3]);
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert_eq!(a.addr(), b.addr());
    assert!(!a.is_unique());
}

#[test]
fn make_mut_copies_when_shared() {
    let mut a = Heap::new(vec![1, 2, 3]);
    let b = a.clone();
    a.make_mut().push(4);
    assert_eq!(*a, vec![1, 2, 3, 4]);
    assert_eq!(*b, vec![1, 2, 3]);
    assert!(!a.ptr_eq(&b));
}

#[test]
fn make_mut_in_place_when_unique() {
    let mut a = Heap::new(String::from("x"));
    let before = a.addr();
    a.make_mut().push('y');
    assert_eq!(a.addr(), before);
    assert_eq!(&*a, "xy");
}

#[test]
fn unsized_payloads() {
    let h: Heap<str> = Heap::from_arc(Arc::from("abc"));
    assert_eq!(&*h, "abc");
    assert!(h.is_unique());
}

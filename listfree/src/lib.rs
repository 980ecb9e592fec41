//! A lock-free prepend-only list.

use std::sync::atomic::{AtomicPtr, Ordering};

/////////////////////////////////////////////// Node ///////////////////////////////////////////////

struct Node<T> {
    data: T,
    next: AtomicPtr<Node<T>>,
}

impl<T> Node<T> {
    fn new(data: T) -> Self {
        let next = AtomicPtr::new(std::ptr::null_mut());
        Self { data, next }
    }

    fn set_next(&self, x: *mut Node<T>) {
        self.next.store(x, Ordering::Release);
    }

    fn get_next(&self) -> *mut Node<T> {
        self.next.load(Ordering::Acquire)
    }
}

mod node_ptr {
    use super::Node;

    fn deref<'a, T>(ptr: *mut Node<T>) -> &'a Node<T> {
        unsafe { &*ptr }
    }

    pub(crate) fn data<'a, T: 'a>(ptr: *mut Node<T>) -> &'a T {
        &deref(ptr).data
    }

    pub(crate) fn set_next<T>(ptr: *mut Node<T>, next: *mut Node<T>) {
        deref(ptr).set_next(next);
    }

    pub(crate) fn get_next<T>(ptr: *mut Node<T>) -> *mut Node<T> {
        deref(ptr).get_next()
    }
}

/////////////////////////////////////////////// List ///////////////////////////////////////////////

/// A lock-free list, generic over data T.
pub struct List<T> {
    head: AtomicPtr<Node<T>>,
}

impl<T> List<T> {
    pub fn prepend(&self, data: T) {
        let node: *mut Node<T> = Box::leak(Box::new(Node::new(data)));
        loop {
            let head = self.head.load(Ordering::Acquire);
            node_ptr::set_next(node, head);
            if self
                .head
                .compare_exchange(head, node, Ordering::SeqCst, Ordering::SeqCst)
                == Ok(head)
            {
                return;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let _list = self;
        let node = self.head.load(Ordering::Acquire);
        ListIterator { _list, node }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        let head = AtomicPtr::new(std::ptr::null_mut());
        Self { head }
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        let mut ptr = self.head.load(Ordering::Acquire);
        while !ptr.is_null() {
            let to_drop = ptr;
            ptr = node_ptr::get_next(ptr);
            drop(unsafe { Box::from_raw(to_drop) });
        }
    }
}

/////////////////////////////////////////// ListIterator ///////////////////////////////////////////

pub struct ListIterator<'a, T> {
    _list: &'a List<T>,
    node: *mut Node<T>,
}

impl<'a, T> Iterator for ListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.node.is_null() {
            None
        } else {
            // SAFETY(rescrv):  We hold an &'a List<T>.
            // This guarantees the list will not deallocate out from under us.
            let data = node_ptr::data(self.node);
            self.node = node_ptr::get_next(self.node);
            Some(data)
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

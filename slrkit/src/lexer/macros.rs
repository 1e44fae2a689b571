
// Terse syntax for pattern trees, e.g.
//
//     pattern!((("/*" & (_ .. "*/")) | ([b'#'] & (_ *))))
//
// where `_` is any character, `&` a sequence, `|` a choice,
// `*`/`+`/`?` repetitions and `..` a repeat-until.
#[macro_export]
macro_rules! pattern {
    (_) => {$crate::lexer::any_char()};
    ([$c:expr]) => {$crate::lexer::literal($c)};
    ($lit:literal) => {$crate::lexer::literal($lit)};

    (($l:tt | $($r:tt)|+)) => {
        $crate::lexer::choice([$crate::pattern!($l), $($crate::pattern!($r)),+])
    };
    (($l:tt & $($r:tt)&+)) => {
        $crate::lexer::sequence([$crate::pattern!($l), $($crate::pattern!($r)),+])
    };
    (($e:tt *)) => {
        $crate::lexer::any_number_of($crate::pattern!($e))
    };
    (($e:tt +)) => {
        $crate::lexer::at_least_one_of($crate::pattern!($e))
    };
    (($e:tt ?)) => {
        $crate::lexer::optional($crate::pattern!($e))
    };
    (($e:tt .. $s:tt)) => {
        $crate::lexer::repeat_until($crate::pattern!($e), $crate::pattern!($s))
    };
}

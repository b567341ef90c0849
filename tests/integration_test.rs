// Integration tests for the interpreter

use minicpp::interpreter::engine::{Interpreter, InterpreterConfig};
use minicpp::interpreter::errors::RuntimeError;
use minicpp::parser::parse::Parser;
use minicpp::{execute, execute_input, run_program, Error};

const PROLOGUE: &str = "#include<iostream>\n#include<cstdio>\nusing namespace std;\n";

fn run_with(body: &str, inputs: Vec<i32>, config: InterpreterConfig) -> Result<String, Error> {
    run_program(&format!("{PROLOGUE}{body}"), inputs, config)
}

fn run(body: &str, inputs: Vec<i32>) -> Result<String, Error> {
    run_with(body, inputs, InterpreterConfig::default())
}

fn output(body: &str) -> String {
    run(body, vec![]).expect("Execution failed")
}

#[test]
fn test_read_and_double() {
    let result = run("int main(){int a;cin>>a;cout<<a*2<<endl;}", vec![5]);
    assert_eq!(result, Ok("10\n".to_string()));
}

#[test]
fn test_function_call() {
    let source = format!(
        r#"{PROLOGUE}
        int f(int x) {{
            return x+1;
        }}

        int main() {{
            cout<<f(4)<<endl;
        }}
    "#
    );

    // Parse
    let parser = Parser::new(&source).expect("Parser creation failed");
    let program = parser.parse_program().expect("Parsing failed");

    // Execute
    let mut interpreter = Interpreter::new(program, vec![], InterpreterConfig::default());
    let result = interpreter.run();

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.terminal().text(), "5\n");
}

#[test]
fn test_array_fill_loop() {
    assert_eq!(
        output("int main(){int a[3];int i;for(i=0;i<3;i=i+1)a[i]=i*i;cout<<a[2]<<endl;}"),
        "4\n"
    );
}

#[test]
fn test_input_exhausted_is_fatal() {
    let result = run("int main(){int a,b;cin>>a;cin>>b;cout<<b;}", vec![1]);
    assert!(matches!(
        result,
        Err(Error::Runtime(RuntimeError::InputExhausted { consumed: 1, .. }))
    ));
}

#[test]
fn test_partial_output_is_kept() {
    let source = format!("{PROLOGUE}int main(){{int a;cout<<1<<endl;cin>>a;cout<<2;}}");
    let execution = execute(&source, vec![], InterpreterConfig::default());
    assert_eq!(execution.output.text(), "1\n");
    assert!(matches!(
        execution.error,
        Some(Error::Runtime(RuntimeError::InputExhausted { .. }))
    ));
}

#[test]
fn test_precedence_and_associativity() {
    assert_eq!(
        output("int main(){cout<<1+2*3<<endl<<10-4-3<<endl<<100/10/5<<endl<<(1+2)*3<<endl;}"),
        "7\n3\n2\n9\n"
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(
        output("int main(){int a,b;a=b=5;cout<<a<<b<<endl;}"),
        "55\n"
    );
}

#[test]
fn test_unary_operators() {
    assert_eq!(
        output("int main(){int a;a=-3;cout<<-a<<endl<<!a<<endl<<!0<<endl<<- -a<<endl<<+a<<endl;}"),
        "3\n0\n1\n-3\n-3\n"
    );
}

#[test]
fn test_comparisons_and_logic() {
    assert_eq!(
        output("int main(){cout<<(3<5)<<(5<=4)<<(2==2)<<(2!=2)<<(1&&0)<<(1||0)<<(3^0)<<(3^4)<<endl;}"),
        "10100110\n"
    );
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    assert_eq!(
        output("int main(){int a;a=0 && putchar(65);cout<<a<<endl;}"),
        "A0\n"
    );
}

#[test]
fn test_integer_division() {
    assert_eq!(
        output("int main(){cout<<-7/2<<endl<<-7%2<<endl<<7%-2<<endl;}"),
        "-3\n-1\n1\n"
    );
}

#[test]
fn test_division_by_zero() {
    let result = run("int main(){int z;cout<<1/z;}", vec![]);
    assert!(matches!(
        result,
        Err(Error::Runtime(RuntimeError::DivisionByZero { .. }))
    ));
}

#[test]
fn test_overflow_wraps() {
    assert_eq!(
        output("int main(){cout<<2147483647+1<<endl;}"),
        "-2147483648\n"
    );
}

#[test]
fn test_block_scope() {
    assert_eq!(
        output("int main(){int x;x=1;{int x;x=2;cout<<x;}cout<<x;{int y;y=9;}int y;cout<<y<<endl;}"),
        "210\n"
    );
}

#[test]
fn test_undeclared_names_are_shared() {
    assert_eq!(
        output("int f(){t=t+1;return 0;} int main(){{t=5;}f();cout<<t<<endl;}"),
        "6\n"
    );
}

#[test]
fn test_array_aliasing() {
    assert_eq!(
        output("int main(){int a[10],i;i=2;a[i+1]=7;cout<<a[3]<<a[1+2]<<a[4]<<endl;a[-1]=5;cout<<a[0-1]<<endl;}"),
        "770\n5\n"
    );
}

#[test]
fn test_multi_dimensional_keys() {
    assert_eq!(
        output("int main(){int g[3][3];g[1][2]=3;cout<<g[1][2]<<g[2][1]<<endl;}"),
        "30\n"
    );
}

#[test]
fn test_declared_size_is_not_checked() {
    assert_eq!(
        output("int main(){int a[2];a[100]=4;cout<<a[100]<<endl;}"),
        "4\n"
    );
}

#[test]
fn test_callee_sees_caller_scope() {
    assert_eq!(
        output("int f(){return y*2;} int main(){{int y;y=21;cout<<f()<<endl;}}"),
        "42\n"
    );
}

#[test]
fn test_callee_declaration_shadows_caller() {
    assert_eq!(
        output("int g(){int y;y=1;return y;} int main(){{int y;y=5;g();cout<<y<<endl;}}"),
        "5\n"
    );
}

#[test]
fn test_recursion() {
    assert_eq!(
        output("int fib(int n){if(n<2)return n;return fib(n-1)+fib(n-2);} int main(){cout<<fib(15)<<endl;}"),
        "610\n"
    );
}

#[test]
fn test_nested_call_arguments() {
    assert_eq!(
        output("int add(int a,int b){return a+b;} int main(){cout<<add(add(1,2),3*4)<<endl;}"),
        "15\n"
    );
}

#[test]
fn test_putchar() {
    assert_eq!(output("int main(){putchar(72);putchar(105);putchar(10);}"), "Hi\n");
}

#[test]
fn test_return_from_inside_loops() {
    assert_eq!(
        output("int find(int t){int i;i=0;while(1){if(i*i>=t)return i;i=i+1;}} int main(){cout<<find(50)<<endl;}"),
        "8\n"
    );
    assert_eq!(
        output("int f(){int i;for(i=0;;i=i+1){if(i==5)return i;}} int main(){cout<<f()<<endl;}"),
        "5\n"
    );
}

#[test]
fn test_for_init_declaration() {
    assert_eq!(
        output("int main(){int s;s=0;for(int i=1;i<=10;i=i+1)s=s+i;cout<<s<<endl;}"),
        "55\n"
    );
}

#[test]
fn test_else_after_nested_if_belongs_to_outer_if() {
    assert_eq!(
        output("int main(){int a;a=0;if(a)if(1)cout<<1;else cout<<2;cout<<endl;}"),
        "2\n"
    );
    assert_eq!(
        output("int main(){int a;a=0;if(1)if(a)cout<<1;else cout<<2;cout<<endl;}"),
        "\n"
    );
}

#[test]
fn test_else_if_chain() {
    assert_eq!(
        output("int sign(int x){if(x>0)return 1;else if(x<0)return -1;else return 0;} int main(){cout<<sign(5)<<sign(-5)<<sign(0)<<endl;}"),
        "1-10\n"
    );
}

#[test]
fn test_globals_and_initializers() {
    assert_eq!(
        output("int n=3,total;int main(){int i;for(i=0;i<n;i=i+1)total=total+i;cout<<total<<endl;}"),
        "3\n"
    );
    assert_eq!(output("int main(){int a=2,b=a*3;cout<<b<<endl;}"), "6\n");
}

#[test]
fn test_no_trailing_newline_and_main_result_discarded() {
    assert_eq!(output("int main(){cout<<1;return 7;cout<<2;}"), "1");
}

#[test]
fn test_missing_prologue() {
    let result = run_program(
        "#include<iostream>\nint main(){}",
        vec![],
        InterpreterConfig::default(),
    );
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn test_malformed_programs() {
    for body in [
        "int main(){a=;}",
        "int main(){(a+b;}",
        "int main(){1=2;}",
        "int main(){cout<<1}",
        "main(){}",
    ] {
        assert!(
            matches!(run(body, vec![]), Err(Error::Parse(_))),
            "expected a parse error for {body}"
        );
    }
}

#[test]
fn test_undefined_function() {
    assert!(matches!(
        run("int main(){g();}", vec![]),
        Err(Error::Runtime(RuntimeError::UndefinedFunction { .. }))
    ));
}

#[test]
fn test_step_limit() {
    let config = InterpreterConfig {
        max_steps: Some(1000),
        ..InterpreterConfig::default()
    };
    assert!(matches!(
        run_with("int main(){while(1);}", vec![], config),
        Err(Error::Runtime(RuntimeError::StepLimitExceeded { limit: 1000, .. }))
    ));
}

#[test]
fn test_call_depth_limit() {
    let config = InterpreterConfig {
        max_call_depth: 20,
        ..InterpreterConfig::default()
    };
    assert!(matches!(
        run_with("int f(int n){return f(n+1);} int main(){f(0);}", vec![], config),
        Err(Error::Runtime(RuntimeError::CallDepthExceeded { limit: 20, .. }))
    ));
}

#[test]
fn test_call_depth_counts_user_calls() {
    let config = InterpreterConfig {
        max_call_depth: 1,
        ..InterpreterConfig::default()
    };
    assert_eq!(
        run_with("int f(){return 3;} int main(){cout<<f()<<endl;}", vec![], config),
        Ok("3\n".to_string())
    );
    assert!(matches!(
        run_with("int g(){return 1;} int f(){return g();} int main(){f();}", vec![], config),
        Err(Error::Runtime(RuntimeError::CallDepthExceeded { limit: 1, .. }))
    ));
}

#[test]
fn test_execute_raw_input() {
    let text = format!(
        "2 3\n4 ignored\n{PROLOGUE}int main(){{int a,b;cin>>a>>b;cout<<a+b<<endl;}}\n"
    );
    let execution = execute_input(&text, InterpreterConfig::default());
    assert!(execution.error.is_none(), "{:?}", execution.error);
    assert_eq!(execution.output.text(), "7\n");
}

#[test]
fn test_trace_follows_execution() {
    let source = format!("{PROLOGUE}int f(int x){{return x;}}\nint main(){{\ncout<<f(1);\n}}");
    let execution = execute(&source, vec![], InterpreterConfig::traced());
    let trace = execution.trace.expect("tracing enabled");

    let steps: Vec<(&str, usize, usize)> = trace
        .snapshots()
        .iter()
        .map(|s| (s.statement, s.location.line, s.call_depth))
        .collect();
    assert_eq!(steps, vec![("cout", 6, 1), ("return", 4, 2)]);
    assert_eq!(trace.get(1).map(|s| s.function.as_str()), Some("f"));
}

/// Source loaded by the "Load sample" action and on startup.
pub const SAMPLE_SOURCE: &str = r#"def calculate_simple_interest(principal, interest_rate, years):
    """
    Simple interest calculation method.

    Parameters:
    principal (float): The initial amount of money
    interest_rate (float): Annual interest rate (as a percentage, e.g., 10 for 10%)
    years (int): Number of years

    Returns:
    float: Total amount (principal + interest)
    """
    interest = principal * (interest_rate / 100) * years
    total = principal + interest
    return total"#;
